//! CLI interface for spelling-algebra
//!
//! Provides command-line utilities for compiling formula lists and running
//! them over syllable dictionaries.

pub mod args;
pub mod commands;
pub mod detect;

pub use args::{Cli, Commands};
pub use detect::{detect_format, InputFormat};
