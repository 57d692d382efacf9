//! The rule boundary.
//!
//! A [`Calculation`] is one compiled transformation step. The engine only
//! relies on [`apply`](Calculation::apply) and the two capability flags; how
//! a calculation is compiled is the business of [`crate::calculus`].

use thiserror::Error;

use super::spelling::Spelling;

/// Runtime failure of a single calculation.
///
/// Failures are deterministic functions of their input and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// The rewritten text grew past the allowed expansion.
    #[error("rewriting '{text}' exceeds the expansion limit of {limit} bytes")]
    ExpansionLimit {
        /// Input text of the failed rewrite
        text: String,
        /// Maximum growth in bytes
        limit: usize,
    },

    /// The input could not be processed by the rule.
    #[error("malformed input: {0}")]
    Malformed(String),
}

/// A compiled spelling transformation.
///
/// Implementations must be pure with respect to `spelling`: the same input
/// always produces the same output, which is what allows one calculation to
/// be shared by all workers of a round.
pub trait Calculation: Send + Sync {
    /// Rewrite `spelling` in place.
    ///
    /// Returns `Ok(true)` if the rule applied, `Ok(false)` if the spelling is
    /// unchanged.
    fn apply(&self, spelling: &mut Spelling) -> Result<bool, CalculationError>;

    /// Whether a successful application forks a new entry under the
    /// rewritten text.
    fn addition(&self) -> bool {
        true
    }

    /// Whether a successful application drops the original entry.
    fn deletion(&self) -> bool {
        true
    }

    /// Human-readable form used in log and error messages.
    fn describe(&self) -> String {
        String::from("<calculation>")
    }
}

impl<C: Calculation + ?Sized> Calculation for Box<C> {
    fn apply(&self, spelling: &mut Spelling) -> Result<bool, CalculationError> {
        (**self).apply(spelling)
    }

    fn addition(&self) -> bool {
        (**self).addition()
    }

    fn deletion(&self) -> bool {
        (**self).deletion()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
