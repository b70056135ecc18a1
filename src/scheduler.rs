//! # Quiz Scheduler
//!
//! Sequences the flashcard cycle as an explicit state machine. Every input,
//! whether a user action, a timer firing or a settings change, goes through
//! [`QuizScheduler::tick`].
//!
//! ## Transitions
//! ```text
//! Stopped          --Start-------------> ShowingQuestion   new note, arm question timer
//! ShowingQuestion  --TimerElapsed------> ShowingAnswer     reveal name, arm answer timer
//! ShowingAnswer    --TimerElapsed------> ShowingQuestion   new note, arm question timer
//! ShowingQuestion  --Skip--------------> ShowingAnswer     reveal now
//! ShowingAnswer    --Skip--------------> ShowingQuestion   next note now
//! running          --ConfigChanged-----> ShowingQuestion   fresh cycle with new settings
//! any              --Stop--------------> Stopped           clear the card
//! ```
//!
//! Anything else is a no-op: starting while running, skipping or changing
//! settings while stopped, and timer events whose handle is not the pending
//! one (a timer that fired after being superseded).
//!
//! ## Timers
//! At most one timer is pending. Every transition cancels the pending timer
//! before arming the next, and settings are read from the [`ConfigSource`]
//! at the start of each phase, so a changed duration or naming style applies
//! to the very next phase.
//!
//! ## Example
//! ```rust
//! use staffcard::{
//!     DeadlineTimer, NoteGenerator, Phase, QuizEvent, QuizScheduler, StaticConfig, SvgRenderer,
//! };
//!
//! let mut quiz = QuizScheduler::new(
//!     StaticConfig::default(),
//!     SvgRenderer::default(),
//!     DeadlineTimer::new(),
//!     NoteGenerator::seeded(1),
//! );
//! assert_eq!(quiz.tick(QuizEvent::Start), Phase::ShowingQuestion);
//! assert_eq!(quiz.tick(QuizEvent::Skip), Phase::ShowingAnswer);
//! assert_eq!(quiz.tick(QuizEvent::Stop), Phase::Stopped);
//! ```

use crate::config::ConfigSource;
use crate::generator::NoteGenerator;
use crate::pitch::Note;
use crate::render::{present_idle, present_question, Renderer};
use crate::timer::{Timer, TimerHandle};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    Start,
    Stop,
    Skip,
    /// A timer armed by the scheduler has fired
    TimerElapsed(TimerHandle),
    /// Settings changed; restart the cycle with them
    ConfigChanged,
}

/// State without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    ShowingQuestion,
    ShowingAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizState {
    #[default]
    Stopped,
    ShowingQuestion {
        note: Note,
        timer: TimerHandle,
    },
    ShowingAnswer {
        note: Note,
        timer: TimerHandle,
    },
}

impl QuizState {
    pub fn phase(&self) -> Phase {
        match self {
            QuizState::Stopped => Phase::Stopped,
            QuizState::ShowingQuestion { .. } => Phase::ShowingQuestion,
            QuizState::ShowingAnswer { .. } => Phase::ShowingAnswer,
        }
    }

    pub fn note(&self) -> Option<&Note> {
        match self {
            QuizState::Stopped => None,
            QuizState::ShowingQuestion { note, .. } | QuizState::ShowingAnswer { note, .. } => {
                Some(note)
            }
        }
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        match self {
            QuizState::Stopped => None,
            QuizState::ShowingQuestion { timer, .. } | QuizState::ShowingAnswer { timer, .. } => {
                Some(*timer)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !matches!(self, QuizState::Stopped)
    }

    /// Which user actions currently do something
    pub fn available_actions(&self) -> Actions {
        let running = self.is_running();
        Actions {
            start: !running,
            stop: running,
            skip: running,
        }
    }
}

/// User actions that are enabled in a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actions {
    pub start: bool,
    pub stop: bool,
    pub skip: bool,
}

/// Owns the quiz state and its collaborators
pub struct QuizScheduler<C, R, T, G = StdRng>
where
    C: ConfigSource,
    R: Renderer,
    T: Timer,
    G: Rng,
{
    config: C,
    renderer: R,
    timer: T,
    generator: NoteGenerator<G>,
    state: QuizState,
}

impl<C, R, T, G> QuizScheduler<C, R, T, G>
where
    C: ConfigSource,
    R: Renderer,
    T: Timer,
    G: Rng,
{
    /// Create a stopped scheduler and draw the idle card.
    pub fn new(config: C, mut renderer: R, timer: T, generator: NoteGenerator<G>) -> Self {
        present_idle(&mut renderer);
        Self {
            config,
            renderer,
            timer,
            generator,
            state: QuizState::Stopped,
        }
    }

    /// Apply one event and return the resulting phase.
    pub fn tick(&mut self, event: QuizEvent) -> Phase {
        let before = self.state.phase();
        let next = match (self.state, event) {
            (QuizState::Stopped, QuizEvent::Start) => self.begin_question(),
            (QuizState::Stopped, QuizEvent::Stop) => {
                self.renderer.clear();
                QuizState::Stopped
            }
            (QuizState::Stopped, _) => QuizState::Stopped,

            (state, QuizEvent::Start) => state,
            (_, QuizEvent::Stop) => {
                self.cancel_pending();
                self.renderer.clear();
                QuizState::Stopped
            }
            (_, QuizEvent::ConfigChanged) => self.begin_question(),

            (QuizState::ShowingQuestion { note, timer }, QuizEvent::TimerElapsed(fired))
                if fired == timer =>
            {
                self.reveal_answer(note)
            }
            (QuizState::ShowingAnswer { timer, .. }, QuizEvent::TimerElapsed(fired))
                if fired == timer =>
            {
                self.begin_question()
            }
            (state, QuizEvent::TimerElapsed(fired)) => {
                debug!(timer = fired.id(), "ignoring stale timer");
                state
            }

            (QuizState::ShowingQuestion { note, .. }, QuizEvent::Skip) => self.reveal_answer(note),
            (QuizState::ShowingAnswer { .. }, QuizEvent::Skip) => self.begin_question(),
        };

        self.state = next;
        let after = next.phase();
        if before != after {
            debug!(?event, from = ?before, to = ?after, "quiz transition");
        }
        after
    }

    pub fn start(&mut self) -> Phase {
        self.tick(QuizEvent::Start)
    }

    pub fn stop(&mut self) -> Phase {
        self.tick(QuizEvent::Stop)
    }

    pub fn skip(&mut self) -> Phase {
        self.tick(QuizEvent::Skip)
    }

    pub fn config_changed(&mut self) -> Phase {
        self.tick(QuizEvent::ConfigChanged)
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn available_actions(&self) -> Actions {
        self.state.available_actions()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.state.pending_timer() {
            self.timer.cancel(handle);
        }
    }

    fn begin_question(&mut self) -> QuizState {
        self.cancel_pending();
        let settings = self.config.settings();
        let clef = self.generator.pick_clef(settings.clef_mode);
        let note = self.generator.generate(clef);
        present_question(&mut self.renderer, &note);
        info!(clef = clef.as_str(), degree = note.degree, step = note.step, "question");

        let timer = self.timer.arm(settings.question_duration);
        QuizState::ShowingQuestion { note, timer }
    }

    fn reveal_answer(&mut self, note: Note) -> QuizState {
        self.cancel_pending();
        let settings = self.config.settings();
        let name = note.name(settings.naming);
        self.renderer.show_answer_text(&name);
        info!(answer = %name, "answer");

        let timer = self.timer.arm(settings.answer_duration);
        QuizState::ShowingAnswer { note, timer }
    }
}
