//! Textflow Stages: the concrete analysis stages run by the pipeline runner.
//!
//! Every stage is pure and deterministic; none depends on another.
//!
//! # Pipeline Flow
//!
//! ```text
//! Input → text_processor → sentiment_analyzer → keyword_extractor → Envelope
//!              ↓                   ↓                    ↓
//!          transforms        polarity/label        keywords/entities
//! ```

pub mod keywords;
pub mod lexicon;
pub mod sentiment;
pub mod text_transform;

pub use keywords::{Keyword, KeywordExtractor, KeywordOptions, NamedEntity};
pub use lexicon::{KeywordLexicon, SentimentLexicon};
pub use sentiment::{Amplification, SentimentOptions, SentimentScore, SentimentScorer};
pub use text_transform::{TextTransformer, TransformOptions};

use textflow_core::{PipelineDefinition, PipelineError, PipelineRunner, Stage};

/// Stage names in default execution order
pub const DEFAULT_ORDER: [&str; 3] = [
    TextTransformer::NAME,
    SentimentScorer::NAME,
    KeywordExtractor::NAME,
];

// ============================================================================
// CONVENIENCE BUILDERS
// ============================================================================

/// Instantiate a stage by its wire name
pub fn stage_by_name(name: &str) -> Option<Box<dyn Stage>> {
    match name {
        TextTransformer::NAME => Some(Box::new(TextTransformer::new())),
        SentimentScorer::NAME => Some(Box::new(SentimentScorer::new())),
        KeywordExtractor::NAME => Some(Box::new(KeywordExtractor::new())),
        _ => None,
    }
}

/// The three stages in the order `transform → sentiment → keywords`.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(TextTransformer::new()),
        Box::new(SentimentScorer::new()),
        Box::new(KeywordExtractor::new()),
    ]
}

/// Runner for `definition`; fails on a stage name this crate does not provide
pub fn build_runner(definition: &PipelineDefinition) -> Result<PipelineRunner, PipelineError> {
    PipelineRunner::from_definition(definition, stage_by_name)
}

/// Default three-stage pipeline with no static config
pub fn default_pipeline() -> Result<PipelineRunner, PipelineError> {
    PipelineRunner::new(default_stages())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_order() {
        let runner = default_pipeline().unwrap();
        assert_eq!(runner.stage_names(), DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_stage_by_name() {
        for name in DEFAULT_ORDER {
            assert_eq!(stage_by_name(name).unwrap().name(), name);
        }
        assert!(stage_by_name("summarizer").is_none());
    }

    #[test]
    fn test_build_runner_unknown_stage() {
        let definition = PipelineDefinition::from_names(["text_processor", "summarizer"]).unwrap();
        let err = build_runner(&definition).err().unwrap();
        assert_eq!(err, PipelineError::UnknownStage("summarizer".to_string()));
    }
}
