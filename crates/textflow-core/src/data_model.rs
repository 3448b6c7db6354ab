//! Data Model: AnalysisRequest, StageResult, PipelineDefinition, Envelope
use crate::error::PipelineError;
use crate::params::Params;
use crate::stage::StageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// One invocation of the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Text to analyse
    pub text: String,
    /// Stage specific options (ex: `to_upper`, `top_n`)
    #[serde(default)]
    pub params: Params,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Params::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Output of a single stage. Never mutated once stored by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage_name: String,
    pub result: Params,
    pub metadata: Params,
}

impl StageResult {
    /// Wrap a JSON object produced by a stage. Anything else is a stage bug.
    pub fn from_json(stage_name: &str, result: Value) -> Result<Self, StageError> {
        let Value::Object(result) = result else {
            return Err(StageError::ExecutionFailed(format!(
                "{} produced a non-object result",
                stage_name
            )));
        };

        let mut metadata = Params::new();
        metadata.insert("processed".to_string(), Value::Bool(true));

        Ok(Self {
            stage_name: stage_name.to_string(),
            result,
            metadata,
        })
    }

    /// Mark the result as a degenerate-input result (ex: empty text)
    pub fn skipped(mut self, reason: &str) -> Self {
        self.metadata.insert("processed".to_string(), Value::Bool(false));
        self.metadata
            .insert("reason".to_string(), Value::String(reason.to_string()));
        self
    }

    pub fn processed(&self) -> bool {
        self.metadata
            .get("processed")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Ordered stage names plus static per-stage config.
///
/// Built once at startup and read-only afterwards; runners share it freely
/// across concurrent requests.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineDefinition {
    stages: Vec<String>,
    stage_config: HashMap<String, Params>,
}

impl PipelineDefinition {
    pub fn new(
        stages: Vec<String>,
        stage_config: HashMap<String, Params>,
    ) -> Result<Self, PipelineError> {
        let mut seen = HashSet::new();
        for name in &stages {
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::DuplicateStage(name.clone()));
            }
        }

        Ok(Self { stages, stage_config })
    }

    /// Definition without static config
    pub fn from_names<I, S>(names: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Into::into).collect(), HashMap::new())
    }

    pub fn stage_names(&self) -> &[String] {
        &self.stages
    }

    pub fn config_for(&self, stage: &str) -> Option<&Params> {
        self.stage_config.get(stage)
    }
}

/// Merged per-request output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub original_text: String,
    /// Stage name → stage result object, in configured stage order
    pub results: serde_json::Map<String, Value>,
    pub metadata: EnvelopeMetadata,
    /// All failure messages joined, present when any stage failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn stage_result(&self, stage: &str) -> Option<&Value> {
        self.results.get(stage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMetadata {
    pub executed_stages: Vec<String>,
    #[serde(default)]
    pub failed_stages: Vec<String>,
}

/// Shape returned when no stage produced a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub error: String,
}

impl From<&PipelineError> for FailureEnvelope {
    fn from(err: &PipelineError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    Succeeded,
    Failed,
    Skipped,
}

/// Execution trace for one stage; kept out of the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: String,
    pub outcome: StageOutcome,
    /// `blake3:<hex>` over the serialized result, when one was produced
    pub digest: Option<String>,
    pub latency_ms: u64,
    pub message: Option<String>,
}

/// Capability listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub name: String,
    pub description: String,
    pub config: Params,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_rejects_duplicates() {
        let err = PipelineDefinition::from_names(["a", "b", "a"]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateStage(name) if name == "a"));
    }

    #[test]
    fn test_stage_result_from_json() {
        let result = StageResult::from_json("x", json!({ "length": 3 })).unwrap();
        assert!(result.processed());
        assert_eq!(result.result.get("length"), Some(&json!(3)));

        let skipped = result.skipped("Empty input text");
        assert!(!skipped.processed());
        assert_eq!(skipped.metadata.get("reason"), Some(&json!("Empty input text")));
    }

    #[test]
    fn test_stage_result_rejects_non_object() {
        let err = StageResult::from_json("x", json!([1, 2])).unwrap_err();
        assert!(matches!(err, StageError::ExecutionFailed(_)));
    }

    #[test]
    fn test_envelope_wire_names() {
        let envelope = Envelope {
            original_text: "hi".to_string(),
            results: serde_json::Map::new(),
            metadata: EnvelopeMetadata {
                executed_stages: vec!["a".to_string()],
                failed_stages: vec![],
            },
            error: None,
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["originalText"], "hi");
        assert_eq!(value["metadata"]["executedStages"], json!(["a"]));
        assert!(value.get("error").is_none());
    }
}
