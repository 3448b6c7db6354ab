//! Textflow Core: Stage Trait, Runner and Data Model
//!
//! A text runs through an ordered list of independent, pure analysis stages;
//! each stage's output is merged into one envelope keyed by stage name.

pub mod context;
pub mod data_model;
pub mod error;
pub mod params;
pub mod runner;
pub mod stage;

pub use context::{PipelineState, RunStatus};
pub use data_model::{
    AnalysisRequest, Envelope, EnvelopeMetadata, FailureEnvelope, PipelineDefinition,
    StageDescriptor, StageOutcome, StageReport, StageResult,
};
pub use error::PipelineError;
pub use params::Params;
pub use runner::{ErrorPolicy, PipelineRunner};
pub use stage::{Stage, StageError};

/// Engine version reported by the service layer
pub const TEXTFLOW_VERSION: &str = env!("CARGO_PKG_VERSION");
