//! # Error Types
//!
//! The trainer's domain operations never fail: malformed settings are clamped
//! or defaulted, and actions that make no sense in the current state are
//! ignored. Errors only come from the edges of the program, where the
//! settings file is read or the command line asks for something impossible.
//!
//! ## Error Types
//! - `Io` - A settings file could not be read or a card could not be written
//! - `ConfigError` - The settings file is not valid YAML
//! - `OutOfRange` - A requested scale degree lies outside the clef's range
//!
//! ## Usage
//! ```rust
//! use staffcard::{FileConfig, TrainerError};
//!
//! match FileConfig::open("missing.yaml", Default::default()) {
//!     Ok(_) => println!("Loaded"),
//!     Err(TrainerError::Io { path, .. }) => eprintln!("Cannot open {}", path),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// A file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings file.
    ///
    /// # Example
    /// ```
    /// # use staffcard::TrainerError;
    /// let err = TrainerError::ConfigError("mapping values are not allowed here".to_string());
    /// assert_eq!(err.to_string(), "Invalid settings: mapping values are not allowed here");
    /// ```
    #[error("Invalid settings: {0}")]
    ConfigError(String),

    /// A scale degree outside the range a clef draws notes from.
    ///
    /// # Example
    /// ```
    /// # use staffcard::TrainerError;
    /// let err = TrainerError::OutOfRange { degree: 50, clef: "treble", min: 28, max: 40 };
    /// assert_eq!(err.to_string(), "Degree 50 is outside the treble range 28..=40");
    /// ```
    #[error("Degree {degree} is outside the {clef} range {min}..={max}")]
    OutOfRange {
        degree: i32,
        clef: &'static str,
        min: i32,
        max: i32,
    },
}
