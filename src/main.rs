use clap::{Args, Parser, Subcommand};
use serde_yaml::Value;
use staffcard::driver::{self, spawn_reader};
use staffcard::{
    note_in_range, render_card, ConfigSource, DeadlineTimer, FileConfig, NoteGenerator, QuizScheduler,
    RawConfig, StaticConfig, TerminalRenderer, TrainerError,
};
use std::fs;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "staffcard", version, about = "Sight-reading flashcards on a staff")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the timed quiz in the terminal
    Run {
        #[command(flatten)]
        settings: SettingsArgs,
        /// Seed for a replayable sequence of notes
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a single flashcard as SVG
    Render {
        #[command(flatten)]
        settings: SettingsArgs,
        #[arg(long)]
        seed: Option<u64>,
        /// Scale degree to draw instead of a random one (octave * 7 + letter, C = 0)
        #[arg(long, allow_hyphen_values = true)]
        degree: Option<i32>,
        /// Include the note name on the card
        #[arg(long)]
        answer: bool,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SettingsArgs {
    /// YAML settings file, re-read at every phase
    #[arg(long)]
    config: Option<PathBuf>,
    /// treble, bass or random
    #[arg(long)]
    clef: Option<String>,
    /// letter or solfege
    #[arg(long)]
    naming: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    question_secs: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    answer_secs: Option<f64>,
}

impl SettingsArgs {
    fn overrides(&self) -> RawConfig {
        RawConfig {
            clef_mode: self.clef.clone().map(Value::String),
            naming: self.naming.clone().map(Value::String),
            question_duration_seconds: self.question_secs.map(|s| Value::Number(s.into())),
            answer_duration_seconds: self.answer_secs.map(|s| Value::Number(s.into())),
        }
    }

    fn source(&self) -> Result<Box<dyn ConfigSource>, TrainerError> {
        let overrides = self.overrides();
        Ok(match &self.config {
            Some(path) => Box::new(FileConfig::open(path, overrides)?),
            None => Box::new(StaticConfig::from_raw(&overrides)),
        })
    }
}

fn generator(seed: Option<u64>) -> NoteGenerator {
    match seed {
        Some(seed) => NoteGenerator::seeded(seed),
        None => NoteGenerator::from_entropy(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("staffcard=warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init();
}

fn run(settings: SettingsArgs, seed: Option<u64>) -> Result<(), TrainerError> {
    let config = settings.source()?;
    let mut quiz = QuizScheduler::new(
        config,
        TerminalRenderer::new(io::stdout()),
        DeadlineTimer::new(),
        generator(seed),
    );

    eprintln!("Commands: start, stop, skip (or Enter), quit");
    let commands = spawn_reader(BufReader::new(io::stdin()));
    driver::run(&mut quiz, commands);
    Ok(())
}

fn render(
    settings: SettingsArgs,
    seed: Option<u64>,
    degree: Option<i32>,
    answer: bool,
    output: Option<PathBuf>,
) -> Result<(), TrainerError> {
    let current = settings.source()?.settings();
    let mut generator = generator(seed);
    let note = match degree {
        Some(degree) => {
            let clef = generator.clef_for_degree(current.clef_mode, degree);
            note_in_range(clef, degree)?
        }
        None => {
            let clef = generator.pick_clef(current.clef_mode);
            generator.generate(clef)
        }
    };

    let svg = render_card(&note, answer.then_some(current.naming));

    match output {
        Some(path) => {
            fs::write(&path, &svg).map_err(|source| TrainerError::Io {
                path: path.display().to_string(),
                source,
            })?;
            eprintln!("Wrote {} card to {}", note.clef.as_str(), path.display());
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { settings, seed } => run(settings, seed),
        Command::Render {
            settings,
            seed,
            degree,
            answer,
            output,
        } => render(settings, seed, degree, answer, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
