//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spelling-algebra")]
#[command(about = "Apply spelling algebra formulas to phonetic dictionaries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the formula list over a dictionary and dump the result
    Apply {
        /// JSON configuration holding the formula list
        #[arg(short, long)]
        config: PathBuf,

        /// Input dictionary (syllable list or dump)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<InputFormat>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker pool size (overrides the configuration)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Run every round on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Run the formula list over individual strings
    Project {
        /// JSON configuration holding the formula list
        #[arg(short, long)]
        config: PathBuf,

        /// Strings to transform
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Compile the formula list and report the first unparsable formula
    Check {
        /// JSON configuration holding the formula list
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Dictionary input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One syllable per line
    Syllables,
    /// Tab-separated dump as written by `apply`
    Dump,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syllables => write!(f, "syllables"),
            Self::Dump => write!(f, "dump"),
        }
    }
}
