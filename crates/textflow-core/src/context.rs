//! Pipeline State: per-run bookkeeping owned by a single runner invocation
use crate::data_model::{Envelope, EnvelopeMetadata, StageResult};
use crate::error::PipelineError;
use serde_json::Value;

/// `Idle → Running(stage index) → Done | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running(usize),
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PipelineState {
    input_text: String,
    results: serde_json::Map<String, Value>,
    executed: Vec<String>,
    failed: Vec<String>,
    current_stage: Option<String>,
    errors: Vec<String>,
    status: RunStatus,
}

impl PipelineState {
    pub fn new(input_text: &str) -> Self {
        Self {
            input_text: input_text.to_string(),
            results: serde_json::Map::new(),
            executed: Vec::new(),
            failed: Vec::new(),
            current_stage: None,
            errors: Vec::new(),
            status: RunStatus::Idle,
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn current_stage(&self) -> Option<&str> {
        self.current_stage.as_deref()
    }

    pub fn results(&self) -> &serde_json::Map<String, Value> {
        &self.results
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Every recorded failure, oldest first, joined with "; "
    pub fn error(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join("; "))
        }
    }

    pub fn begin(&mut self, index: usize, stage: &str) {
        self.status = RunStatus::Running(index);
        self.current_stage = Some(stage.to_string());
    }

    /// Store a stage result. Returns false if the key was already taken,
    /// in which case the stored result is left untouched.
    pub fn record_success(&mut self, result: StageResult) -> bool {
        if self.results.contains_key(&result.stage_name) {
            return false;
        }
        self.executed.push(result.stage_name.clone());
        self.results
            .insert(result.stage_name, Value::Object(result.result));
        true
    }

    pub fn record_failure(&mut self, stage: &str, message: String) {
        self.failed.push(stage.to_string());
        self.errors.push(message);
    }

    pub fn finish(&mut self) {
        self.status = if self.errors.is_empty() && !self.results.is_empty() {
            RunStatus::Done
        } else {
            RunStatus::Failed
        };
    }

    /// Turn the finished state into the caller-facing envelope
    pub fn into_envelope(self) -> Result<Envelope, PipelineError> {
        if self.results.is_empty() {
            let reason = self
                .error()
                .unwrap_or_else(|| "pipeline has no stages".to_string());
            return Err(PipelineError::NoResults(reason));
        }

        let error = self.error();
        Ok(Envelope {
            original_text: self.input_text,
            results: self.results,
            metadata: EnvelopeMetadata {
                executed_stages: self.executed,
                failed_stages: self.failed,
            },
            error,
        })
    }
}
