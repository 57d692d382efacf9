//! JSON configuration for a projection.
//!
//! ```json
//! {
//!   "algebra": [
//!     "xform/^([nl])ue$/$1ve/",
//!     "derive/^([zcs])h/$1/",
//!     "abbrev/^([a-z]).+$/$1/"
//!   ],
//!   "workers": 8,
//!   "strategy": "parallel",
//!   "min_parallel_keys": 64
//! }
//! ```
//!
//! Every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algebra::engine::{default_workers, EngineConfig, ExecutionStrategy, DEFAULT_MIN_PARALLEL_KEYS};
use crate::algebra::error::ProjectionError;
use crate::algebra::projection::Projection;

/// Errors reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// Malformed JSON or wrong field types
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Formula list plus engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgebraConfig {
    /// Formulas, applied in order
    pub algebra: Vec<String>,
    /// Worker pool size; defaults to the available parallelism
    pub workers: Option<usize>,
    /// Execution strategy
    pub strategy: ExecutionStrategy,
    /// Rounds over fewer keys run sequentially
    pub min_parallel_keys: usize,
}

impl Default for AlgebraConfig {
    fn default() -> Self {
        Self {
            algebra: Vec::new(),
            workers: None,
            strategy: ExecutionStrategy::default(),
            min_parallel_keys: DEFAULT_MIN_PARALLEL_KEYS,
        }
    }
}

impl AlgebraConfig {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Engine settings described by this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            strategy: self.strategy,
            workers: self.workers.unwrap_or_else(default_workers).max(1),
            min_parallel_keys: self.min_parallel_keys,
        }
    }

    /// Build the engine and compile the formula list.
    pub fn build_projection(&self) -> Result<Projection, ProjectionError> {
        let mut projection = Projection::new(self.engine_config())?;
        projection.load(&self.algebra)?;
        Ok(projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AlgebraConfig::from_json_str("{}").unwrap();
        assert!(config.algebra.is_empty());
        assert_eq!(config.strategy, ExecutionStrategy::Parallel);
        assert_eq!(config.min_parallel_keys, DEFAULT_MIN_PARALLEL_KEYS);
        assert!(config.engine_config().workers >= 1);
    }

    #[test]
    fn test_full_document() {
        let config = AlgebraConfig::from_json_str(
            r#"{
                "algebra": ["derive/^zh/z/", "erase/^hm$/"],
                "workers": 3,
                "strategy": "sequential",
                "min_parallel_keys": 0
            }"#,
        )
        .unwrap();
        assert_eq!(config.algebra.len(), 2);
        let engine = config.engine_config();
        assert_eq!(engine.workers, 3);
        assert_eq!(engine.strategy, ExecutionStrategy::Sequential);

        let projection = config.build_projection().unwrap();
        assert_eq!(projection.len(), 2);
    }

    #[test]
    fn test_bad_strategy() {
        assert!(matches!(
            AlgebraConfig::from_json_str(r#"{"strategy": "eventually"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_build_projection_reports_formula() {
        let config = AlgebraConfig {
            algebra: vec!["(bad(regex".into(), "valid->rule".into()],
            strategy: ExecutionStrategy::Sequential,
            ..AlgebraConfig::default()
        };
        match config.build_projection() {
            Err(ProjectionError::InvalidFormula { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected outcome: {:?}", other.map(|p| p.len())),
        }
    }
}
