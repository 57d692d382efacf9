//! # spelling-algebra
//!
//! Spelling algebra for phonetic input dictionaries.
//!
//! A [`Script`](algebra::Script) maps syllable keys to the spellings
//! recorded for them. A [`Projection`](algebra::Projection) is an ordered
//! list of formulas (`xform`, `derive`, `fuzz`, `abbrev`, `erase`, `xlit`)
//! that rewrites, forks or deletes keys, one round per formula. Rounds run on
//! a map/reduce [`TransformEngine`](algebra::TransformEngine) whose output
//! is identical to strict sequential application for any worker count.
//!
//! ## Example
//!
//! ```rust,ignore
//! use spelling_algebra::prelude::*;
//!
//! let mut projection = Projection::new(EngineConfig::default())?;
//! projection.load(&["derive/^([zcs])h/$1/", "abbrev/^([a-z]).+$/$1/"])?;
//!
//! let mut script = Script::from_syllables(["zhi", "chi", "shi", "ri"]);
//! projection.apply_script(&mut script)?;
//!
//! assert!(script.contains_key("zi"));
//! assert!(script.contains_key("z"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algebra;
pub mod calculus;
pub mod config;
pub mod serialization;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::algebra::{
        Calculation, CalculationError, EngineConfig, ExecutionStrategy, Projection,
        ProjectionError, Script, Spelling, SpellingProperties, SpellingType, TransformEngine,
    };
    pub use crate::calculus::{Calculus, CalculusError};
    pub use crate::config::{AlgebraConfig, ConfigError};
    pub use crate::serialization::{load_syllables, ScriptDumper, ScriptFormatError};
}
