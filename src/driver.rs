//! Interactive loop for the terminal trainer.
//!
//! The scheduler lives on the calling thread. A reader thread turns stdin
//! lines into [`Command`]s and sends them over a channel; the loop waits on
//! that channel until the pending timer's deadline, then delivers the timer
//! event itself. Settings sources that can change on their own are polled
//! every [`CONFIG_POLL_INTERVAL`].

use crate::config::ConfigSource;
use crate::render::Renderer;
use crate::scheduler::{Phase, QuizEvent, QuizScheduler};
use crate::timer::DeadlineTimer;
use rand::Rng;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const CONFIG_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A line typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Skip,
    Quit,
}

impl Command {
    /// Parse a command line. An empty line skips.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "start" | "go" => Some(Command::Start),
            "stop" => Some(Command::Stop),
            "" | "skip" | "s" | "n" | "next" => Some(Command::Skip),
            "quit" | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }

    fn event(&self) -> Option<QuizEvent> {
        match self {
            Command::Start => Some(QuizEvent::Start),
            Command::Stop => Some(QuizEvent::Stop),
            Command::Skip => Some(QuizEvent::Skip),
            Command::Quit => None,
        }
    }
}

/// Read commands from any line source on a background thread. End of input
/// is reported as `Quit`.
pub fn spawn_reader<B>(input: B) -> Receiver<Command>
where
    B: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "stopped reading input");
                    break;
                }
            };
            match Command::parse(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        return;
                    }
                }
                None => warn!(input = %line.trim(), "unknown command (start, stop, skip, quit)"),
            }
        }
        let _ = tx.send(Command::Quit);
    });
    rx
}

/// Run the quiz until `Quit` arrives or the command channel closes. Returns
/// the phase the quiz was in when the loop ended.
pub fn run<C, R, G>(
    quiz: &mut QuizScheduler<C, R, DeadlineTimer, G>,
    commands: Receiver<Command>,
) -> Phase
where
    C: ConfigSource,
    R: Renderer,
    G: Rng,
{
    loop {
        let now = Instant::now();
        if let Some(fired) = quiz.timer_mut().take_expired(now) {
            quiz.tick(QuizEvent::TimerElapsed(fired));
            continue;
        }

        if quiz.config_mut().has_changed() {
            info!("settings changed");
            quiz.tick(QuizEvent::ConfigChanged);
        }

        let wait = quiz
            .timer()
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(CONFIG_POLL_INTERVAL)
            .min(CONFIG_POLL_INTERVAL);

        match commands.recv_timeout(wait) {
            Ok(command) => match command.event() {
                Some(event) => {
                    quiz.tick(event);
                }
                None => {
                    debug!("quit requested");
                    break;
                }
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    quiz.stop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StaticConfig, TrainerSettings};
    use crate::generator::{ClefMode, NoteGenerator};
    use crate::pitch::Clef;
    use crate::render::TerminalRenderer;
    use std::io::Cursor;

    /// Switches from treble to bass after the first question and reports
    /// that change once
    #[derive(Default)]
    struct SwitchingConfig {
        reads: usize,
        reported: bool,
    }

    impl ConfigSource for SwitchingConfig {
        fn settings(&mut self) -> TrainerSettings {
            self.reads += 1;
            let clef = if self.reported { Clef::Bass } else { Clef::Treble };
            TrainerSettings {
                clef_mode: ClefMode::Fixed(clef),
                ..TrainerSettings::default()
            }
        }

        fn has_changed(&mut self) -> bool {
            if self.reads > 0 && !self.reported {
                self.reported = true;
                return true;
            }
            false
        }
    }

    #[derive(Default)]
    struct StaffLog {
        staves: Vec<Clef>,
    }

    impl Renderer for StaffLog {
        fn draw_staff(&mut self, clef: Clef) {
            self.staves.push(clef);
        }
        fn draw_ledgers(&mut self, _steps: &[i32]) {}
        fn draw_note(&mut self, _step: i32) {}
        fn draw_note_ledger(&mut self, _step: i32) {}
        fn show_answer_text(&mut self, _text: &str) {}
        fn clear(&mut self) {}
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("start"), Some(Command::Start));
        assert_eq!(Command::parse(" STOP "), Some(Command::Stop));
        assert_eq!(Command::parse(""), Some(Command::Skip));
        assert_eq!(Command::parse("next"), Some(Command::Skip));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("pause"), None);
    }

    #[test]
    fn test_reader_ends_with_quit() {
        let rx = spawn_reader(Cursor::new("start\nbogus\nskip\n"));
        let commands: Vec<Command> = rx.iter().collect();
        assert_eq!(commands, vec![Command::Start, Command::Skip, Command::Quit]);
    }

    #[test]
    fn test_run_processes_queued_commands() {
        let mut quiz = QuizScheduler::new(
            StaticConfig::default(),
            TerminalRenderer::new(Vec::new()),
            DeadlineTimer::new(),
            NoteGenerator::seeded(2),
        );
        let (tx, rx) = mpsc::channel();
        for command in [Command::Start, Command::Skip, Command::Quit] {
            tx.send(command).unwrap();
        }

        assert_eq!(run(&mut quiz, rx), Phase::Stopped);
        assert_eq!(quiz.timer().active_count(), 0);
    }

    #[test]
    fn test_run_ends_when_channel_closes() {
        let mut quiz = QuizScheduler::new(
            StaticConfig::default(),
            TerminalRenderer::new(Vec::new()),
            DeadlineTimer::new(),
            NoteGenerator::seeded(2),
        );
        let (tx, rx) = mpsc::channel::<Command>();
        drop(tx);
        assert_eq!(run(&mut quiz, rx), Phase::Stopped);
    }

    #[test]
    fn test_run_restarts_cycle_on_settings_change() {
        let mut quiz = QuizScheduler::new(
            SwitchingConfig::default(),
            StaffLog::default(),
            DeadlineTimer::new(),
            NoteGenerator::seeded(4),
        );
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Start).unwrap();
        tx.send(Command::Quit).unwrap();

        run(&mut quiz, rx);

        // Idle card, first question, then a fresh question after the change
        assert_eq!(
            quiz.renderer().staves,
            vec![Clef::Treble, Clef::Treble, Clef::Bass]
        );
        assert_eq!(quiz.config_mut().reads, 2);
        assert_eq!(quiz.timer().active_count(), 0);
    }
}
