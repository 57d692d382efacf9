//! Ordered pipeline of calculations.
//!
//! A [`Projection`] is loaded once from a formula list and then applied any
//! number of times, either to a single string ([`apply_str`]) or to a whole
//! [`Script`] ([`apply_script`]). Both apply operations leave their argument
//! untouched on failure.
//!
//! [`apply_str`]: Projection::apply_str
//! [`apply_script`]: Projection::apply_script

use log::{error, info};

use super::calculation::Calculation;
use super::engine::{EngineConfig, TransformEngine};
use super::error::{ProjectionError, Result};
use super::script::Script;
use super::spelling::Spelling;
use crate::calculus::Calculus;

/// An ordered list of calculations plus the engine that runs them.
pub struct Projection {
    calculations: Vec<Box<dyn Calculation>>,
    engine: TransformEngine,
}

impl Projection {
    /// An empty projection backed by an engine built from `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::with_engine(TransformEngine::new(config)?))
    }

    /// An empty projection that runs every round on the calling thread.
    pub fn sequential() -> Self {
        Self::with_engine(TransformEngine::sequential())
    }

    /// An empty projection backed by `engine`.
    pub fn with_engine(engine: TransformEngine) -> Self {
        Self {
            calculations: Vec::new(),
            engine,
        }
    }

    /// Compile `formulas` with the standard [`Calculus`], replacing any
    /// previously loaded calculations.
    ///
    /// On failure the projection is left empty.
    pub fn load<S: AsRef<str>>(&mut self, formulas: &[S]) -> Result<()> {
        self.load_with(&Calculus::new(), formulas)
    }

    /// Like [`load`](Self::load), with a caller-supplied calculus.
    pub fn load_with<S: AsRef<str>>(&mut self, calculus: &Calculus, formulas: &[S]) -> Result<()> {
        self.calculations.clear();
        let mut calculations = Vec::with_capacity(formulas.len());
        for (i, formula) in formulas.iter().enumerate() {
            let formula = formula.as_ref();
            match calculus.parse(formula) {
                Ok(calculation) => calculations.push(calculation),
                Err(source) => {
                    error!(
                        "Error loading spelling algebra definition #{}: '{}': {}",
                        i + 1,
                        formula,
                        source
                    );
                    return Err(ProjectionError::InvalidFormula {
                        index: i + 1,
                        formula: formula.to_string(),
                        source,
                    });
                }
            }
        }
        self.calculations = calculations;
        Ok(())
    }

    /// Append an already compiled calculation.
    pub fn push(&mut self, calculation: Box<dyn Calculation>) {
        self.calculations.push(calculation);
    }

    /// Number of calculations.
    pub fn len(&self) -> usize {
        self.calculations.len()
    }

    /// Whether no calculations are loaded.
    pub fn is_empty(&self) -> bool {
        self.calculations.is_empty()
    }

    /// The engine used by [`apply_script`](Self::apply_script).
    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    /// Thread `value` through every calculation in order.
    ///
    /// Returns `Ok(true)` and overwrites `value` with the final text if any
    /// calculation applied. An empty string is never modified.
    pub fn apply_str(&self, value: &mut String) -> Result<bool> {
        if value.is_empty() {
            return Ok(false);
        }
        let mut spelling = Spelling::new(value.as_str());
        let mut modified = false;
        for (i, calculation) in self.calculations.iter().enumerate() {
            match calculation.apply(&mut spelling) {
                Ok(applied) => modified |= applied,
                Err(source) => {
                    error!("Error applying calculation: {}", source);
                    return Err(ProjectionError::Calculation {
                        round: i + 1,
                        key: value.clone(),
                        source,
                    });
                }
            }
        }
        if modified {
            *value = spelling.text;
        }
        Ok(modified)
    }

    /// Run one round per calculation over `script`.
    ///
    /// Returns `Ok(true)` and replaces the contents of `script` with the
    /// final generation if any calculation applied to any key.
    pub fn apply_script(&self, script: &mut Script) -> Result<bool> {
        match self.engine.run(&self.calculations, script)? {
            Some(next) => {
                *script = next;
                info!("Total Size: {}", script.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field(
                "calculations",
                &self.calculations.iter().map(|c| c.describe()).collect::<Vec<_>>(),
            )
            .field("engine", &self.engine)
            .finish()
    }
}
