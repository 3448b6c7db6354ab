//! Stage Trait: the single contract every analysis stage implements
use crate::data_model::StageResult;
use crate::params::Params;

/// Contract for one analysis stage.
///
/// `process` must be a pure function of `text` and `params`: no I/O, no
/// shared mutable state and no randomness. The runner relies on this to
/// produce identical envelopes for identical requests.
pub trait Stage: Send + Sync {
    /// Unique stage name (ex: "sentiment_analyzer"), used as the results key
    fn name(&self) -> &'static str;

    /// Short human readable description for capability listings
    fn description(&self) -> &'static str;

    /// Runs the stage against `text` with the effective parameter set
    fn process(&self, text: &str, params: &Params) -> Result<StageResult, StageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    InvalidInput(String),
    ExecutionFailed(String),
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "STAGE/INPUT: {}", msg),
            Self::ExecutionFailed(msg) => write!(f, "STAGE/EXEC: {}", msg),
        }
    }
}

impl std::error::Error for StageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display() {
        let err = StageError::ExecutionFailed("boom".to_string());
        assert_eq!(err.to_string(), "STAGE/EXEC: boom");

        let err = StageError::InvalidInput("bad".to_string());
        assert_eq!(err.to_string(), "STAGE/INPUT: bad");
    }
}
