use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("could not parse {field} from {origin}")]
    MissingField { field: &'static str, origin: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("snapshots are from different drives: {first} vs {second}")]
    IdentityMismatch { first: String, second: String },
    #[error("snapshot 1 ({first}) must be earlier than snapshot 2 ({second})")]
    OrderingViolation {
        first: NaiveDateTime,
        second: NaiveDateTime,
    },
    #[error(
        "data units written decreased between snapshots ({first} -> {second}); check snapshot order"
    )]
    CounterRegression { first: u64, second: u64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("time delta must be positive, got {days} days")]
    NonPositiveElapsedTime { days: f64 },
    #[error("{which} has no timestamp; elapsed time cannot be derived")]
    MissingTimestamp { which: &'static str },
    #[error("flash units written decreased between snapshots ({before} -> {after})")]
    FlashCounterRegression { before: u64, after: u64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("could not auto-detect capacity; specify it explicitly")]
    MissingCapacity,
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
