//! API Handlers
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use textflow_core::{
    AnalysisRequest, Envelope, FailureEnvelope, Params, PipelineRunner, TEXTFLOW_VERSION,
};
use textflow_stages::{stage_by_name, DEFAULT_ORDER};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

pub const MAX_CONCURRENT_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Envelope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    #[serde(default)]
    pub params: Params,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    5
}

/// One batch entry; `text` echoes the input it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub success: bool,
    pub text: String,
    pub result: Option<Envelope>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub success: bool,
    pub results: Vec<BatchItem>,
    pub processed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": TEXTFLOW_VERSION })),
    )
}

/// Every known stage with its enabled flag. Running stages are described by
/// the pipeline itself; disabled ones by their configured section.
pub async fn list_tools(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    state.metrics.record_request("tools");

    let mut tools = serde_json::Map::new();
    for descriptor in state.runner.describe() {
        tools.insert(
            descriptor.name.clone(),
            json!({
                "enabled": true,
                "name": descriptor.name,
                "description": descriptor.description,
                "config": descriptor.config,
            }),
        );
    }

    for name in DEFAULT_ORDER {
        if tools.contains_key(name) {
            continue;
        }
        let Some(stage) = stage_by_name(name) else {
            continue;
        };
        tools.insert(
            name.to_string(),
            json!({
                "enabled": false,
                "name": name,
                "description": stage.description(),
                "config": state.config.stage_params(name).unwrap_or_default(),
            }),
        );
    }

    (StatusCode::OK, Json(Value::Object(tools)))
}

pub async fn process(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> (StatusCode, Json<TextResponse>) {
    state.metrics.record_request("process");
    let response = run_one(&state, request).await;
    (StatusCode::OK, Json(response))
}

pub async fn process_batch(
    State(state): State<AppState>,
    Json(batch): Json<BatchRequest>,
) -> (StatusCode, Json<BatchResponse>) {
    state.metrics.record_request("process_batch");

    if !(1..=MAX_CONCURRENT_LIMIT).contains(&batch.max_concurrent) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BatchResponse {
                success: false,
                results: Vec::new(),
                processed_count: 0,
                error: Some(format!(
                    "max_concurrent must be between 1 and {}, got {}",
                    MAX_CONCURRENT_LIMIT, batch.max_concurrent
                )),
            }),
        );
    }

    info!(
        texts = batch.texts.len(),
        max_concurrent = batch.max_concurrent,
        "processing batch"
    );

    let semaphore = Arc::new(Semaphore::new(batch.max_concurrent));
    let mut handles = Vec::with_capacity(batch.texts.len());
    for text in batch.texts {
        let request = AnalysisRequest {
            text,
            params: batch.params.clone(),
        };
        let state = state.clone();
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquiring cannot fail
            let _permit = semaphore.acquire_owned().await.ok();
            let text = request.text.clone();
            let response = run_one(&state, request).await;
            BatchItem {
                success: response.success,
                text,
                result: response.result,
                error: response.error,
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(item) => results.push(item),
            Err(err) => {
                error!(error = %err, "batch task failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(BatchResponse {
                        success: false,
                        results: Vec::new(),
                        processed_count: 0,
                        error: Some(format!("Error in batch processing: {}", err)),
                    }),
                );
            }
        }
    }

    let processed_count = results.len();
    (
        StatusCode::OK,
        Json(BatchResponse {
            success: true,
            results,
            processed_count,
            error: None,
        }),
    )
}

pub async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics.encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => {
            error!(error = %err, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Runs the pipeline on a blocking thread and folds the outcome into a response
async fn run_one(state: &AppState, request: AnalysisRequest) -> TextResponse {
    let runner: Arc<PipelineRunner> = state.runner.clone();
    let outcome = tokio::task::spawn_blocking(move || runner.run(&request)).await;
    state.metrics.texts_processed.inc();

    match outcome {
        Ok(Ok(envelope)) => {
            state
                .metrics
                .record_stage_failures(&envelope.metadata.failed_stages);
            TextResponse {
                success: true,
                result: Some(envelope),
                error: None,
            }
        }
        Ok(Err(err)) => {
            warn!(error = %err, "pipeline produced no result");
            let failure = FailureEnvelope::from(&err);
            TextResponse {
                success: false,
                result: None,
                error: Some(failure.error),
            }
        }
        Err(err) => {
            error!(error = %err, "pipeline task panicked");
            TextResponse {
                success: false,
                result: None,
                error: Some(format!("Error processing text: {}", err)),
            }
        }
    }
}
