//! Dictionary dump and load.
//!
//! A [`Script`](crate::algebra::Script) is persisted as tab-separated text,
//! one line per `(key, spelling)` pair. See [`ScriptDumper`] for the
//! format.

mod plaintext_impl;

pub use self::plaintext_impl::{load_syllables, ScriptDumper};

/// Errors that can occur while reading or writing a dump.
#[derive(Debug, thiserror::Error)]
pub enum ScriptFormatError {
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A spelling line appeared before any key.
    #[error("line {line}: spelling without a key")]
    MissingKey {
        /// 1-based line number
        line: usize,
    },

    /// Wrong number of tab-separated fields.
    #[error("line {line}: expected 5 fields, found {found}")]
    FieldCount {
        /// 1-based line number
        line: usize,
        /// Fields present on the line
        found: usize,
    },

    /// The reliability field is not one of the dump symbols.
    #[error("line {line}: unknown spelling type '{symbol}'")]
    UnknownType {
        /// 1-based line number
        line: usize,
        /// The offending field
        symbol: String,
    },

    /// The credibility field is not a number.
    #[error("line {line}: invalid credibility '{value}'")]
    Credibility {
        /// 1-based line number
        line: usize,
        /// The offending field
        value: String,
    },
}
