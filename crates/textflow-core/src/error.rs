//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("CONFIG/unknown stage: {0}")]
    UnknownStage(String),

    #[error("CONFIG/duplicate stage: {0}")]
    DuplicateStage(String),

    #[error("RUN/no stage produced a result: {0}")]
    NoResults(String),
}
