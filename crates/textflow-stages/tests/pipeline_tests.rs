//! End-to-end runs of the real stages through the pipeline runner.

use serde_json::json;
use std::collections::HashMap;
use textflow_core::{
    AnalysisRequest, ErrorPolicy, Params, PipelineDefinition, PipelineRunner, Stage, StageError,
    StageOutcome, StageResult,
};
use textflow_stages::{
    build_runner, default_pipeline, KeywordExtractor, SentimentScorer, TextTransformer,
};

/// Stand-in stage that always fails, used to exercise error continuation
struct Unavailable;

impl Stage for Unavailable {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn description(&self) -> &'static str {
        "Fails on every input"
    }

    fn process(&self, _text: &str, _params: &Params) -> Result<StageResult, StageError> {
        Err(StageError::ExecutionFailed("backend offline".to_string()))
    }
}

fn object(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap()
}

// =============================================================================
// Ordering and envelope shape
// =============================================================================

#[test]
fn test_default_pipeline_envelope() {
    let runner = default_pipeline().unwrap();
    let request = AnalysisRequest::new("I am very sad")
        .with_param("to_upper", true)
        .with_param("top_n", 2);

    let envelope = runner.run(&request).unwrap();
    assert_eq!(envelope.original_text, "I am very sad");
    assert_eq!(
        envelope.metadata.executed_stages,
        vec!["text_processor", "sentiment_analyzer", "keyword_extractor"]
    );
    assert!(envelope.error.is_none());

    let transformed = &envelope.results["text_processor"];
    assert_eq!(transformed["uppercase"], "I AM VERY SAD");

    let sentiment = &envelope.results["sentiment_analyzer"];
    assert_eq!(sentiment["label"], "negative");
    assert_eq!(sentiment["subjectivity"].as_f64(), Some(0.625));

    let keywords = &envelope.results["keyword_extractor"];
    assert_eq!(keywords["keywords"], json!([{ "phrase": "sad", "score": 33.33 }]));
}

#[test]
fn test_results_follow_definition_order() {
    let definition = PipelineDefinition::from_names([
        KeywordExtractor::NAME,
        TextTransformer::NAME,
        SentimentScorer::NAME,
    ])
    .unwrap();
    let runner = build_runner(&definition).unwrap();

    let envelope = runner.run(&AnalysisRequest::new("Good news")).unwrap();
    let keys: Vec<&str> = envelope.results.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["keyword_extractor", "text_processor", "sentiment_analyzer"]
    );
    assert_eq!(envelope.metadata.executed_stages, keys);
}

#[test]
fn test_static_config_and_request_override() {
    let mut config = HashMap::new();
    config.insert(
        KeywordExtractor::NAME.to_string(),
        object(json!({ "top_n": 1, "extract_named_entities": true })),
    );
    config.insert(
        TextTransformer::NAME.to_string(),
        object(json!({ "reverse": true })),
    );
    let definition = PipelineDefinition::new(
        vec![
            TextTransformer::NAME.to_string(),
            KeywordExtractor::NAME.to_string(),
        ],
        config,
    )
    .unwrap();
    let runner = build_runner(&definition).unwrap();

    let text = "Rust loves Rust and Ferris loves crabs";
    let envelope = runner.run(&AnalysisRequest::new(text)).unwrap();
    assert_eq!(
        envelope.results["text_processor"]["reversed"],
        "sbarc sevol sirreF dna tsuR sevol tsuR"
    );
    assert_eq!(
        envelope.results["keyword_extractor"]["keywords"]
            .as_array()
            .unwrap()
            .len(),
        1
    );

    let request = AnalysisRequest::new(text)
        .with_param("top_n", 3)
        .with_param("reverse", false);
    let envelope = runner.run(&request).unwrap();
    assert!(envelope.results["text_processor"].get("reversed").is_none());
    let keywords = envelope.results["keyword_extractor"]["keywords"]
        .as_array()
        .unwrap();
    assert_eq!(keywords.len(), 3);
    assert_eq!(keywords[0]["phrase"], "rust");
    assert_eq!(keywords[1]["phrase"], "loves");
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_failed_stage_does_not_stop_later_stages() {
    let runner = PipelineRunner::new(vec![
        Box::new(TextTransformer::new()),
        Box::new(Unavailable),
        Box::new(KeywordExtractor::new()),
    ])
    .unwrap();

    let (envelope, reports) = runner
        .run_traced(&AnalysisRequest::new("pipelines keep going"))
        .unwrap();
    assert_eq!(
        envelope.metadata.executed_stages,
        vec!["text_processor", "keyword_extractor"]
    );
    assert_eq!(envelope.metadata.failed_stages, vec!["unavailable"]);
    assert!(envelope.results.contains_key("keyword_extractor"));
    assert_eq!(
        envelope.error.as_deref(),
        Some("Error in unavailable: STAGE/EXEC: backend offline")
    );
    assert_eq!(reports[1].outcome, StageOutcome::Failed);
    assert_eq!(reports[2].outcome, StageOutcome::Succeeded);
}

#[test]
fn test_halt_policy_stops_at_first_failure() {
    let runner = PipelineRunner::new(vec![
        Box::new(TextTransformer::new()),
        Box::new(Unavailable),
        Box::new(KeywordExtractor::new()),
    ])
    .unwrap()
    .with_policy(ErrorPolicy::HaltOnError);

    let envelope = runner.run(&AnalysisRequest::new("stop here")).unwrap();
    assert_eq!(envelope.metadata.executed_stages, vec!["text_processor"]);
    assert!(!envelope.results.contains_key("keyword_extractor"));
    assert!(envelope.error.is_some());
}

#[test]
fn test_only_failures_is_total_failure() {
    let runner = PipelineRunner::new(vec![Box::new(Unavailable)]).unwrap();
    let err = runner.run(&AnalysisRequest::new("anything")).unwrap_err();
    let failure = textflow_core::FailureEnvelope::from(&err);
    assert!(failure.error.contains("backend offline"));
}

// =============================================================================
// Boundaries and determinism
// =============================================================================

#[test]
fn test_empty_input_is_not_an_error() {
    let runner = default_pipeline().unwrap();
    let request = AnalysisRequest::new("")
        .with_param("to_upper", true)
        .with_param("analyze_sentences", true)
        .with_param("extract_named_entities", true);

    let envelope = runner.run(&request).unwrap();
    assert!(envelope.error.is_none());

    let transformed = &envelope.results["text_processor"];
    assert_eq!(transformed["uppercase"], "");
    assert_eq!(transformed["length"], 0);
    assert_eq!(transformed["word_count"], 0);
    assert_eq!(transformed["line_count"], 0);

    let sentiment = &envelope.results["sentiment_analyzer"];
    assert_eq!(sentiment["polarity"].as_f64(), Some(0.0));
    assert_eq!(sentiment["subjectivity"].as_f64(), Some(0.0));
    assert_eq!(sentiment["word_count"], 0);
    assert_eq!(sentiment["sentence_count"], 0);

    let keywords = &envelope.results["keyword_extractor"];
    assert_eq!(keywords["keywords"], json!([]));
    assert_eq!(keywords["named_entities"], json!([]));
    assert_eq!(keywords["text_length"], 0);
    assert_eq!(keywords["word_count"], 0);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let runner = default_pipeline().unwrap();
    let request = AnalysisRequest::new(
        "The Model Context Protocol is great. Nobody was unhappy! Really good work.",
    )
    .with_param("title_case", true)
    .with_param("analyze_sentences", true)
    .with_param("extract_named_entities", true);

    let first = serde_json::to_string(&runner.run(&request).unwrap()).unwrap();
    let second = serde_json::to_string(&runner.run(&request).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_reports_digest_matches_across_runs() {
    let runner = default_pipeline().unwrap();
    let request = AnalysisRequest::new("same text twice");

    let (_, first) = runner.run_traced(&request).unwrap();
    let (_, second) = runner.run_traced(&request).unwrap();
    let digests = |reports: &[textflow_core::StageReport]| {
        reports.iter().map(|r| r.digest.clone()).collect::<Vec<_>>()
    };
    assert_eq!(digests(&first[..]), digests(&second[..]));
}

#[test]
fn test_describe_lists_static_config() {
    let mut config = HashMap::new();
    config.insert(
        SentimentScorer::NAME.to_string(),
        object(json!({ "analyze_sentences": true })),
    );
    let definition =
        PipelineDefinition::new(vec![SentimentScorer::NAME.to_string()], config).unwrap();
    let runner = build_runner(&definition).unwrap();

    let described = runner.describe();
    assert_eq!(described.len(), 1);
    assert_eq!(described[0].name, "sentiment_analyzer");
    assert_eq!(described[0].config, object(json!({ "analyze_sentences": true })));
}
