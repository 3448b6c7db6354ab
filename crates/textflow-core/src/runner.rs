//! Pipeline Runner: executes stages in a fixed order and merges their results
use crate::context::PipelineState;
use crate::data_model::{
    AnalysisRequest, Envelope, PipelineDefinition, StageDescriptor, StageOutcome, StageReport,
};
use crate::error::PipelineError;
use crate::params::{self, Params};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What the runner does after a stage fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Record the failure and keep running the remaining stages
    #[default]
    #[serde(rename = "continue")]
    ContinueOnError,
    /// Record the failure and skip the remaining stages
    #[serde(rename = "halt")]
    HaltOnError,
}

struct ConfiguredStage {
    stage: Box<dyn Stage>,
    config: Params,
}

pub struct PipelineRunner {
    stages: Vec<ConfiguredStage>,
    policy: ErrorPolicy,
    pipeline_id: String,
}

impl PipelineRunner {
    /// Runner over `stages` in the given order, without static config
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Result<Self, PipelineError> {
        let definition = PipelineDefinition::from_names(stages.iter().map(|s| s.name()))?;
        let mut stages = stages.into_iter();
        Self::from_definition(&definition, |_| stages.next())
    }

    /// Runner for `definition`, asking `resolve` for each named stage in order
    pub fn from_definition<F>(
        definition: &PipelineDefinition,
        mut resolve: F,
    ) -> Result<Self, PipelineError>
    where
        F: FnMut(&str) -> Option<Box<dyn Stage>>,
    {
        let mut stages = Vec::with_capacity(definition.stage_names().len());
        for name in definition.stage_names() {
            let stage = resolve(name).ok_or_else(|| PipelineError::UnknownStage(name.clone()))?;
            if stage.name() != name {
                return Err(PipelineError::UnknownStage(name.clone()));
            }
            stages.push(ConfiguredStage {
                stage,
                config: definition.config_for(name).cloned().unwrap_or_default(),
            });
        }

        let pipeline_id = definition.stage_names().join("→");
        Ok(Self {
            stages,
            policy: ErrorPolicy::default(),
            pipeline_id,
        })
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.stage.name()).collect()
    }

    /// Name, description and static config of each configured stage
    pub fn describe(&self) -> Vec<StageDescriptor> {
        self.stages
            .iter()
            .map(|s| StageDescriptor {
                name: s.stage.name().to_string(),
                description: s.stage.description().to_string(),
                config: s.config.clone(),
            })
            .collect()
    }

    pub fn run(&self, request: &AnalysisRequest) -> Result<Envelope, PipelineError> {
        self.run_traced(request).map(|(envelope, _)| envelope)
    }

    /// Like [`run`](Self::run), also returning one report per configured stage
    pub fn run_traced(
        &self,
        request: &AnalysisRequest,
    ) -> Result<(Envelope, Vec<StageReport>), PipelineError> {
        let mut state = PipelineState::new(&request.text);
        let mut reports = Vec::with_capacity(self.stages.len());
        let mut halted = false;

        for (index, configured) in self.stages.iter().enumerate() {
            let name = configured.stage.name();

            if halted {
                reports.push(StageReport {
                    stage: name.to_string(),
                    outcome: StageOutcome::Skipped,
                    digest: None,
                    latency_ms: 0,
                    message: None,
                });
                continue;
            }

            state.begin(index, name);
            let effective = params::merge(&configured.config, &request.params);
            debug!(pipeline = %self.pipeline_id, stage = name, index, "running stage");

            let start = Instant::now();
            let outcome = configured.stage.process(state.input_text(), &effective);
            let latency_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(mut result) => {
                    result.stage_name = name.to_string();
                    let digest = serde_json::to_vec(&result.result)
                        .ok()
                        .map(|bytes| format!("blake3:{}", blake3::hash(&bytes)));

                    if !state.record_success(result) {
                        warn!(stage = name, "duplicate stage result ignored");
                    }
                    reports.push(StageReport {
                        stage: name.to_string(),
                        outcome: StageOutcome::Succeeded,
                        digest,
                        latency_ms,
                        message: None,
                    });
                }
                Err(err) => {
                    let message = format!("Error in {}: {}", name, err);
                    warn!(stage = name, error = %err, "stage failed");
                    state.record_failure(name, message.clone());
                    reports.push(StageReport {
                        stage: name.to_string(),
                        outcome: StageOutcome::Failed,
                        digest: None,
                        latency_ms,
                        message: Some(message),
                    });
                    halted = self.policy == ErrorPolicy::HaltOnError;
                }
            }
        }

        state.finish();
        info!(
            pipeline = %self.pipeline_id,
            status = ?state.status(),
            succeeded = state.results().len(),
            failed = state.errors().len(),
            "pipeline run finished"
        );

        let envelope = state.into_envelope()?;
        Ok((envelope, reports))
    }
}
