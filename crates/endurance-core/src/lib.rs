pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod snapshot;
pub mod validate;

#[cfg(test)]
mod pipeline_tests;

pub use analysis::{analyze, Analysis, SnapshotSource};
pub use config::{CapacitySource, DeviceParameters, ParameterInput};
pub use engine::{compute, EnduranceMetrics, FlashCounters, WafSource};
pub use error::{AnalysisError, EngineError, ExtractError, ParameterError, ValidationError};
pub use extract::{detect_dialect, extract};
pub use snapshot::{Dialect, Snapshot};
pub use validate::validate_pair;
