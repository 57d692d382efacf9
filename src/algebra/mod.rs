//! Spelling algebra core.
//!
//! - [`spelling`]: value types
//! - [`script`]: the dictionary and its merge algebra
//! - [`calculation`]: the rule boundary
//! - [`engine`]: sequential and map/reduce round execution
//! - [`projection`]: the load/apply driver

pub mod calculation;
pub mod engine;
pub mod error;
pub mod projection;
pub mod script;
pub mod spelling;

pub use calculation::{Calculation, CalculationError};
pub use engine::{EngineConfig, ExecutionStrategy, RoundOutcome, TransformEngine};
pub use error::ProjectionError;
pub use projection::Projection;
pub use script::Script;
pub use spelling::{Spelling, SpellingProperties, SpellingType};
