//! # Trainer Settings
//!
//! Settings are read in two stages, the same way score front matter is:
//! a permissive [`RawConfig`] is deserialized from YAML, then resolved into
//! typed [`TrainerSettings`]. Resolution never fails. Unknown clef modes or
//! naming styles fall back to the defaults, and durations are defaulted or
//! clamped (see [`parse_seconds`]).
//!
//! ## File Format
//! ```yaml
//! clef-mode: random              # treble | bass | random
//! naming: letter                 # letter | solfege
//! question-duration-seconds: 2.0
//! answer-duration-seconds: 1.0
//! ```
//!
//! ## Sources
//! The scheduler polls a [`ConfigSource`] at the start of every phase.
//! - [`StaticConfig`] holds settings in memory (command line only, tests)
//! - [`FileConfig`] re-reads a YAML file on every poll, so edits take effect
//!   on the next phase

use crate::error::TrainerError;
use crate::generator::ClefMode;
use crate::pitch::NamingStyle;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Shortest phase the scheduler will arm a timer for
pub const MIN_PHASE_DURATION: Duration = Duration::from_millis(100);
pub const DEFAULT_QUESTION_DURATION: Duration = Duration::from_millis(2000);
pub const DEFAULT_ANSWER_DURATION: Duration = Duration::from_millis(1000);
/// Longest phase the scheduler will arm a timer for
pub const MAX_PHASE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings as written, before validation
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RawConfig {
    pub clef_mode: Option<Value>,
    pub naming: Option<Value>,
    pub question_duration_seconds: Option<Value>,
    pub answer_duration_seconds: Option<Value>,
}

impl RawConfig {
    /// Parse YAML settings. An empty document yields all defaults.
    pub fn from_yaml(content: &str) -> Result<Self, TrainerError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| TrainerError::ConfigError(e.to_string()))
    }

    /// Values from `over` win wherever they are set
    pub fn overlay(self, over: &RawConfig) -> RawConfig {
        RawConfig {
            clef_mode: over.clef_mode.clone().or(self.clef_mode),
            naming: over.naming.clone().or(self.naming),
            question_duration_seconds: over
                .question_duration_seconds
                .clone()
                .or(self.question_duration_seconds),
            answer_duration_seconds: over
                .answer_duration_seconds
                .clone()
                .or(self.answer_duration_seconds),
        }
    }

    pub fn resolve(&self) -> TrainerSettings {
        let clef_mode = match self.clef_mode.as_ref() {
            None => ClefMode::default(),
            Some(value) => value_as_str(value)
                .as_deref()
                .and_then(ClefMode::from_str)
                .unwrap_or_else(|| {
                    warn!(?value, "unknown clef mode, using random");
                    ClefMode::default()
                }),
        };

        let naming = match self.naming.as_ref() {
            None => NamingStyle::default(),
            Some(value) => value_as_str(value)
                .as_deref()
                .and_then(NamingStyle::from_str)
                .unwrap_or_else(|| {
                    warn!(?value, "unknown naming style, using letter names");
                    NamingStyle::default()
                }),
        };

        TrainerSettings {
            clef_mode,
            naming,
            question_duration: parse_seconds(
                self.question_duration_seconds.as_ref(),
                DEFAULT_QUESTION_DURATION,
            ),
            answer_duration: parse_seconds(
                self.answer_duration_seconds.as_ref(),
                DEFAULT_ANSWER_DURATION,
            ),
        }
    }
}

fn value_as_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert a seconds value into a phase duration.
///
/// Missing, non-numeric, zero or non-finite values give `default`. Anything
/// shorter than [`MIN_PHASE_DURATION`], negative values included, is raised
/// to it, and anything longer than [`MAX_PHASE_DURATION`] is lowered to it.
pub fn parse_seconds(value: Option<&Value>, default: Duration) -> Duration {
    let seconds = match value {
        None => return default,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match seconds {
        Some(s) if s.is_finite() && s != 0.0 => {
            let min = MIN_PHASE_DURATION.as_secs_f64();
            let max = MAX_PHASE_DURATION.as_secs_f64();
            if s < min || s > max {
                debug!(seconds = s, "phase duration clamped");
            }
            Duration::try_from_secs_f64(s.clamp(min, max)).unwrap_or(default)
        }
        _ => {
            warn!(?value, default_ms = default.as_millis() as u64, "invalid duration, using default");
            default
        }
    }
}

/// Validated settings for one phase of the quiz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerSettings {
    pub clef_mode: ClefMode,
    pub naming: NamingStyle,
    pub question_duration: Duration,
    pub answer_duration: Duration,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            clef_mode: ClefMode::default(),
            naming: NamingStyle::default(),
            question_duration: DEFAULT_QUESTION_DURATION,
            answer_duration: DEFAULT_ANSWER_DURATION,
        }
    }
}

/// Supplies the current settings whenever the scheduler starts a phase
pub trait ConfigSource {
    fn settings(&mut self) -> TrainerSettings;

    /// Whether the settings changed since the last call. Sources that only
    /// change through their owner report `false`.
    fn has_changed(&mut self) -> bool {
        false
    }
}

impl<C: ConfigSource + ?Sized> ConfigSource for Box<C> {
    fn settings(&mut self) -> TrainerSettings {
        (**self).settings()
    }

    fn has_changed(&mut self) -> bool {
        (**self).has_changed()
    }
}

/// Settings held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    settings: TrainerSettings,
}

impl StaticConfig {
    pub fn new(settings: TrainerSettings) -> Self {
        Self { settings }
    }

    pub fn from_raw(raw: &RawConfig) -> Self {
        Self::new(raw.resolve())
    }

    pub fn set(&mut self, settings: TrainerSettings) {
        self.settings = settings;
    }
}

impl ConfigSource for StaticConfig {
    fn settings(&mut self) -> TrainerSettings {
        self.settings
    }
}

/// Settings backed by a YAML file, with command line values layered on top
#[derive(Debug)]
pub struct FileConfig {
    path: PathBuf,
    overrides: RawConfig,
    last_good: TrainerSettings,
    modified: Option<SystemTime>,
}

impl FileConfig {
    /// Open a settings file. Unlike later polls, the first read must succeed.
    pub fn open(path: impl AsRef<Path>, overrides: RawConfig) -> Result<Self, TrainerError> {
        let path = path.as_ref().to_path_buf();
        let raw = read_raw(&path)?;
        let last_good = raw.overlay(&overrides).resolve();
        let modified = modified_time(&path);
        Ok(Self {
            path,
            overrides,
            last_good,
            modified,
        })
    }
}

impl ConfigSource for FileConfig {
    fn settings(&mut self) -> TrainerSettings {
        match read_raw(&self.path) {
            Ok(raw) => {
                self.last_good = raw.overlay(&self.overrides).resolve();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "keeping previous settings");
            }
        }
        self.last_good
    }

    /// Whether the file's modification time moved since the last check
    fn has_changed(&mut self) -> bool {
        let current = modified_time(&self.path);
        if current != self.modified {
            self.modified = current;
            true
        } else {
            false
        }
    }
}

fn read_raw(path: &Path) -> Result<RawConfig, TrainerError> {
    let content = fs::read_to_string(path).map_err(|source| TrainerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    RawConfig::from_yaml(&content)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Clef;

    fn seconds(v: &str) -> Value {
        serde_yaml::from_str(v).unwrap()
    }

    #[test]
    fn test_defaults_when_empty() {
        let raw = RawConfig::from_yaml("").unwrap();
        assert_eq!(raw.resolve(), TrainerSettings::default());
    }

    #[test]
    fn test_full_config() {
        let raw = RawConfig::from_yaml(
            r#"
clef-mode: bass
naming: solfège
question-duration-seconds: 3.5
answer-duration-seconds: "0.5"
"#,
        )
        .unwrap();
        let settings = raw.resolve();
        assert_eq!(settings.clef_mode, ClefMode::Fixed(Clef::Bass));
        assert_eq!(settings.naming, NamingStyle::Solfege);
        assert_eq!(settings.question_duration, Duration::from_millis(3500));
        assert_eq!(settings.answer_duration, Duration::from_millis(500));
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let raw = RawConfig::from_yaml("clef-mode: alto\nnaming: numbers\n").unwrap();
        let settings = raw.resolve();
        assert_eq!(settings.clef_mode, ClefMode::Random);
        assert_eq!(settings.naming, NamingStyle::Letter);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let result = RawConfig::from_yaml("clef-mode: [unclosed");
        assert!(matches!(result, Err(TrainerError::ConfigError(_))));
    }

    #[test]
    fn test_parse_seconds_defaults() {
        let default = DEFAULT_QUESTION_DURATION;
        assert_eq!(parse_seconds(None, default), default);
        assert_eq!(parse_seconds(Some(&seconds("abc")), default), default);
        assert_eq!(parse_seconds(Some(&seconds("0")), default), default);
        assert_eq!(parse_seconds(Some(&seconds(".nan")), default), default);
        assert_eq!(parse_seconds(Some(&seconds("[1, 2]")), default), default);
    }

    #[test]
    fn test_parse_seconds_clamps_to_minimum() {
        let default = DEFAULT_ANSWER_DURATION;
        assert_eq!(parse_seconds(Some(&seconds("0.01")), default), MIN_PHASE_DURATION);
        assert_eq!(parse_seconds(Some(&seconds("-4")), default), MIN_PHASE_DURATION);
        assert_eq!(parse_seconds(Some(&seconds("0.1")), default), MIN_PHASE_DURATION);
        assert_eq!(parse_seconds(Some(&seconds("1.25")), default), Duration::from_millis(1250));
    }

    #[test]
    fn test_parse_seconds_caps_huge_values() {
        let default = DEFAULT_QUESTION_DURATION;
        assert_eq!(parse_seconds(Some(&seconds("1e20")), default), MAX_PHASE_DURATION);
        assert_eq!(parse_seconds(Some(&seconds("1e19")), default), MAX_PHASE_DURATION);
        assert_eq!(parse_seconds(Some(&seconds("86400")), default), MAX_PHASE_DURATION);
        assert_eq!(parse_seconds(Some(&seconds("-1e20")), default), MIN_PHASE_DURATION);

        let settings = RawConfig::from_yaml("question-duration-seconds: 1e20\n")
            .unwrap()
            .resolve();
        assert_eq!(settings.question_duration, MAX_PHASE_DURATION);
    }

    #[test]
    fn test_overlay_prefers_overrides() {
        let base = RawConfig::from_yaml("clef-mode: bass\nnaming: solfege\n").unwrap();
        let over = RawConfig {
            clef_mode: Some(Value::String("treble".to_string())),
            ..Default::default()
        };
        let settings = base.overlay(&over).resolve();
        assert_eq!(settings.clef_mode, ClefMode::Fixed(Clef::Treble));
        assert_eq!(settings.naming, NamingStyle::Solfege);
    }

    #[test]
    fn test_static_config_set() {
        let mut config = StaticConfig::default();
        assert_eq!(config.settings(), TrainerSettings::default());
        let updated = TrainerSettings {
            naming: NamingStyle::Solfege,
            ..TrainerSettings::default()
        };
        config.set(updated);
        assert_eq!(config.settings(), updated);
    }

    #[test]
    fn test_file_config_rereads_and_keeps_last_good() {
        let dir = std::env::temp_dir().join(format!("staffcard-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.yaml");
        fs::write(&path, "clef-mode: treble\n").unwrap();

        let mut config = FileConfig::open(&path, RawConfig::default()).unwrap();
        assert_eq!(config.settings().clef_mode, ClefMode::Fixed(Clef::Treble));

        fs::write(&path, "clef-mode: bass\n").unwrap();
        assert_eq!(config.settings().clef_mode, ClefMode::Fixed(Clef::Bass));

        fs::write(&path, "clef-mode: [broken").unwrap();
        assert_eq!(config.settings().clef_mode, ClefMode::Fixed(Clef::Bass));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_config_reports_change_once() {
        let dir = std::env::temp_dir().join(format!("staffcard-mtime-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.yaml");
        fs::write(&path, "naming: letter\n").unwrap();

        let mut config = FileConfig::open(&path, RawConfig::default()).unwrap();
        assert!(!config.has_changed());

        fs::write(&path, "naming: solfege\n").unwrap();
        let later = SystemTime::now() + Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert!(config.has_changed());
        assert!(!config.has_changed());
        assert_eq!(config.settings().naming, NamingStyle::Solfege);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_config_missing_file() {
        let result = FileConfig::open("/nonexistent/staffcard.yaml", RawConfig::default());
        assert!(matches!(result, Err(TrainerError::Io { .. })));
    }
}
