//! Error types for loading and applying a projection.

use thiserror::Error;

use super::calculation::CalculationError;
use crate::calculus::CalculusError;

/// Errors surfaced by [`Projection`](super::projection::Projection).
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A formula failed to compile; the whole load is aborted.
    ///
    /// `index` is 1-based, matching how formulas are numbered in
    /// configuration files.
    #[error("formula #{index} is unparsable: '{formula}'")]
    InvalidFormula {
        /// 1-based position in the formula list
        index: usize,
        /// The offending formula text
        formula: String,
        /// Compiler diagnosis
        #[source]
        source: CalculusError,
    },

    /// A rule failed while transforming a spelling.
    #[error("calculation #{round} failed on '{key}'")]
    Calculation {
        /// 1-based round (= rule position)
        round: usize,
        /// Key (or string) being transformed
        key: String,
        /// Rule diagnosis
        #[source]
        source: CalculationError,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A specialized `Result` type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
