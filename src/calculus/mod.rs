//! Formula compiler.
//!
//! Turns formula strings such as `derive/^([zcs])h/$1/` into
//! [`Calculation`]s. A formula is a lowercase operator name, followed by a
//! separator character of the author's choosing, followed by the operator's
//! arguments delimited by that same separator:
//!
//! ```text
//! xlit/abc/xyz/            transliterate a→x, b→y, c→z
//! xform/^(.*)ue$/$1ve/     rewrite, dropping the original
//! erase/^hm$/              drop keys matching the whole pattern
//! derive/^([nl])ue$/$1ve/  rewrite, keeping the original
//! fuzz/^([zcs])h/$1/       as derive, marking the result ambiguous
//! abbrev/^(.).+$/$1/       as derive, marking the result an abbreviation
//! ```
//!
//! Patterns use [`regex`] syntax. In replacements, `$1` always refers to a
//! numbered group even when letters follow (`$1ve`); `${name}` and `$$`
//! work as in [`regex::Regex::replace_all`].

mod operators;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::algebra::calculation::Calculation;

pub use operators::{
    Erasion, RewriteMode, Transformation, Transliteration, ABBREVIATION_PENALTY,
    FUZZY_SPELLING_PENALTY, MAX_EXPANSION,
};

/// Errors raised while compiling a formula.
#[derive(Debug, Error, Clone)]
pub enum CalculusError {
    /// The formula does not start with an operator name.
    #[error("missing operator name")]
    MissingOperator,

    /// The operator name runs to the end of the formula.
    #[error("missing separator after operator '{0}'")]
    MissingSeparator(String),

    /// No operator is registered under this name.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// Too few arguments for the operator.
    #[error("operator '{operator}' expects {expected} argument(s), found {found}")]
    Arity {
        /// Operator name
        operator: String,
        /// Required argument count
        expected: usize,
        /// Supplied argument count
        found: usize,
    },

    /// The pattern argument is empty.
    #[error("empty pattern")]
    EmptyPattern,

    /// Transliteration tables of unequal length.
    #[error("transliteration maps {from} character(s) onto {to}")]
    LengthMismatch {
        /// Characters in the source table
        from: usize,
        /// Characters in the target table
        to: usize,
    },

    /// The pattern is not a valid regular expression.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Builds a calculation from the arguments following the operator name.
pub type Factory = fn(&[&str]) -> Result<Box<dyn Calculation>, CalculusError>;

/// Registry of formula operators.
pub struct Calculus {
    factories: FxHashMap<&'static str, Factory>,
}

impl Calculus {
    /// A calculus with the standard operators registered.
    pub fn new() -> Self {
        let mut calculus = Self {
            factories: FxHashMap::default(),
        };
        calculus.register("xlit", Transliteration::parse);
        calculus.register("xform", |args| Transformation::parse(RewriteMode::Transform, args));
        calculus.register("erase", Erasion::parse);
        calculus.register("derive", |args| Transformation::parse(RewriteMode::Derive, args));
        calculus.register("fuzz", |args| Transformation::parse(RewriteMode::Fuzz, args));
        calculus.register("abbrev", |args| Transformation::parse(RewriteMode::Abbreviate, args));
        calculus
    }

    /// Register (or replace) an operator.
    pub fn register(&mut self, name: &'static str, factory: Factory) {
        self.factories.insert(name, factory);
    }

    /// Compile one formula.
    pub fn parse(&self, formula: &str) -> Result<Box<dyn Calculation>, CalculusError> {
        let sep = match formula.find(|c: char| !c.is_ascii_lowercase()) {
            Some(0) => return Err(CalculusError::MissingOperator),
            Some(sep) => sep,
            None if formula.is_empty() => return Err(CalculusError::MissingOperator),
            None => return Err(CalculusError::MissingSeparator(formula.to_string())),
        };
        let operator = &formula[..sep];
        let separator = formula[sep..].chars().next().unwrap_or('/');
        let args: Vec<&str> = formula[sep..].split(separator).skip(1).collect();

        let factory = self
            .factories
            .get(operator)
            .ok_or_else(|| CalculusError::UnknownOperator(operator.to_string()))?;
        factory(&args)
    }
}

impl Default for Calculus {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail with [`CalculusError::Arity`] unless `args` has at least `expected`
/// entries.
pub(crate) fn require_args(operator: &str, args: &[&str], expected: usize) -> Result<(), CalculusError> {
    if args.len() < expected {
        return Err(CalculusError::Arity {
            operator: operator.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}
