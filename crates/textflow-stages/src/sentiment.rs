//! Rule-based sentiment scoring.
//!
//! Tokens are matched against fixed positive/negative word sets. A negation
//! directly before a sentiment word flips its contribution, and intensifiers
//! anywhere in the text amplify the polarity by up to 50%.

use crate::lexicon::{self, SentimentLexicon};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;
use textflow_core::params::{self, Params};
use textflow_core::{Stage, StageError, StageResult};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

const MAX_AMPLIFICATION: f64 = 0.5;
const AMPLIFICATION_PER_INTENSIFIER: f64 = 0.1;
const SUBJECTIVITY_WEIGHT: f64 = 2.5;
const LABEL_THRESHOLD: f64 = 0.1;

/// How intensifiers scale the base polarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Amplification {
    /// Scale the magnitude, keep the sign
    #[default]
    SignPreserving,
    /// Bit-exact legacy formula: multiplies by the sign of the base value a
    /// second time, so amplified negative text flips to positive
    LegacySignInverting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentOptions {
    pub analyze_sentences: bool,
    pub amplification: Amplification,
}

impl SentimentOptions {
    pub fn from_params(params: &Params) -> Self {
        let amplification = if params::flag(params, "legacy_intensifier_sign") {
            Amplification::LegacySignInverting
        } else {
            Amplification::SignPreserving
        };
        Self {
            analyze_sentences: params::flag(params, "analyze_sentences"),
            amplification,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentScore {
    /// In `[-1, 1]`
    pub polarity: f64,
    /// In `[0, 1]`
    pub subjectivity: f64,
}

impl SentimentScore {
    pub fn label(&self) -> &'static str {
        if self.polarity > LABEL_THRESHOLD {
            "positive"
        } else if self.polarity < -LABEL_THRESHOLD {
            "negative"
        } else {
            "neutral"
        }
    }

    fn to_json(self) -> Value {
        json!({
            "polarity": round4(self.polarity),
            "subjectivity": round4(self.subjectivity),
            "label": self.label(),
        })
    }
}

pub struct SentimentScorer {
    lexicon: Arc<SentimentLexicon>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    pub const NAME: &'static str = "sentiment_analyzer";

    pub fn new() -> Self {
        Self::with_lexicon(lexicon::sentiment_lexicon())
    }

    pub fn with_lexicon(lexicon: Arc<SentimentLexicon>) -> Self {
        Self { lexicon }
    }

    /// Polarity and subjectivity of `text`
    pub fn score(&self, text: &str, amplification: Amplification) -> SentimentScore {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = WORD.find_iter(&lowered).map(|m| m.as_str()).collect();
        if words.is_empty() {
            return SentimentScore::default();
        }

        let mut pos_count = 0usize;
        let mut neg_count = 0usize;
        for (i, word) in words.iter().enumerate() {
            let negated = i > 0 && self.lexicon.negations.contains(words[i - 1]);
            let positive = self.lexicon.positive.contains(*word);
            let negative = !positive && self.lexicon.negative.contains(*word);

            if (positive && !negated) || (negative && negated) {
                pos_count += 1;
            } else if positive || negative {
                neg_count += 1;
            }
        }

        let intensifier_count = words
            .iter()
            .filter(|w| self.lexicon.intensifiers.contains(**w))
            .count();

        let sentiment_words = pos_count + neg_count;
        let mut polarity = if sentiment_words == 0 {
            0.0
        } else {
            (pos_count as f64 - neg_count as f64) / sentiment_words as f64
        };

        if polarity != 0.0 && intensifier_count > 0 {
            let factor = 1.0
                + MAX_AMPLIFICATION.min(intensifier_count as f64 * AMPLIFICATION_PER_INTENSIFIER);
            polarity = match amplification {
                Amplification::SignPreserving => polarity * factor,
                Amplification::LegacySignInverting => {
                    let sign = if polarity > 0.0 { 1.0 } else { -1.0 };
                    polarity * factor * sign
                }
            };
        }

        let subjectivity =
            (sentiment_words as f64 / words.len() as f64 * SUBJECTIVITY_WEIGHT).min(1.0);

        SentimentScore {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity,
        }
    }
}

impl Stage for SentimentScorer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Analyzes the sentiment of text using a rule-based approach."
    }

    fn process(&self, text: &str, params: &Params) -> Result<StageResult, StageError> {
        let text = text.trim();
        if text.is_empty() {
            let result = StageResult::from_json(
                Self::NAME,
                json!({
                    "polarity": 0.0,
                    "subjectivity": 0.0,
                    "label": "neutral",
                    "word_count": 0,
                    "sentence_count": 0,
                }),
            )?;
            return Ok(result.skipped("Empty input text"));
        }

        let options = SentimentOptions::from_params(params);
        let score = self.score(text, options.amplification);
        let sentences = split_sentences(text);

        let mut result = json!({
            "polarity": round4(score.polarity),
            "subjectivity": round4(score.subjectivity),
            "label": score.label(),
            "word_count": count_words(text),
            "sentence_count": sentences.len(),
        });

        if options.analyze_sentences {
            let per_sentence: Vec<Value> = sentences
                .iter()
                .map(|sentence| {
                    json!({
                        "text": sentence,
                        "sentiment": self.score(sentence, options.amplification).to_json(),
                        "word_count": count_words(sentence),
                    })
                })
                .collect();
            result["sentences"] = Value::Array(per_sentence);
        }

        StageResult::from_json(Self::NAME, result)
    }
}

fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Four decimals, exact ties to even
fn round4(value: f64) -> f64 {
    format!("{:.4}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, params: Value) -> StageResult {
        let params = params.as_object().cloned().unwrap_or_default();
        SentimentScorer::new().process(text, &params).unwrap()
    }

    #[test]
    fn test_intensified_negative_stays_negative() {
        let result = run("I am very sad", json!({})).result;
        assert_eq!(result["polarity"].as_f64(), Some(-1.0));
        assert_eq!(result["subjectivity"].as_f64(), Some(0.625));
        assert_eq!(result["label"], "negative");
        assert_eq!(result["word_count"], 4);
        assert_eq!(result["sentence_count"], 1);
    }

    #[test]
    fn test_legacy_formula_flips_intensified_negative() {
        // The legacy formula reports this sentence as maximally positive.
        let result = run("I am very sad", json!({ "legacy_intensifier_sign": true })).result;
        assert_eq!(result["polarity"].as_f64(), Some(1.0));
        assert_eq!(result["label"], "positive");
    }

    #[test]
    fn test_amplification_of_partial_polarity() {
        let scorer = SentimentScorer::new();

        let score = scorer.score("bad bad good very", Amplification::SignPreserving);
        assert_eq!(round4(score.polarity), -0.3667);

        let score = scorer.score("bad bad good very", Amplification::LegacySignInverting);
        assert_eq!(round4(score.polarity), 0.3667);

        let score = scorer.score("good good bad very", Amplification::SignPreserving);
        assert_eq!(round4(score.polarity), 0.3667);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        // one sentiment word in sixteen tokens: 0.15625
        let text = format!("sad{}", " table".repeat(15));
        let result = run(&text, json!({})).result;
        assert_eq!(result["subjectivity"].as_f64(), Some(0.1562));

        assert_eq!(round4(0.03125), 0.0312);
        assert_eq!(round4(0.09375), 0.0938);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let result = run("I am not happy", json!({})).result;
        assert_eq!(result["polarity"].as_f64(), Some(-1.0));
        assert_eq!(result["subjectivity"].as_f64(), Some(1.0));
        assert_eq!(result["label"], "negative");

        let result = run("never bad", json!({})).result;
        assert_eq!(result["label"], "positive");
    }

    #[test]
    fn test_positive_and_neutral() {
        let result = run("This is a great day", json!({})).result;
        assert_eq!(result["polarity"].as_f64(), Some(1.0));
        assert_eq!(result["subjectivity"].as_f64(), Some(0.5));
        assert_eq!(result["label"], "positive");

        let result = run("The weather is cloudy", json!({})).result;
        assert_eq!(result["polarity"].as_f64(), Some(0.0));
        assert_eq!(result["subjectivity"].as_f64(), Some(0.0));
        assert_eq!(result["label"], "neutral");
    }

    #[test]
    fn test_sentence_analysis() {
        let result = run(
            "I love this. I hate that!",
            json!({ "analyze_sentences": true }),
        )
        .result;
        assert_eq!(result["sentence_count"], 2);

        let sentences = result["sentences"].as_array().unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0]["text"], "I love this");
        assert_eq!(sentences[0]["sentiment"]["label"], "positive");
        assert_eq!(sentences[1]["text"], "I hate that");
        assert_eq!(sentences[1]["sentiment"]["label"], "negative");
        assert_eq!(sentences[1]["word_count"], 3);
    }

    #[test]
    fn test_sentences_absent_unless_requested() {
        let result = run("Fine. Great!", json!({})).result;
        assert!(!result.contains_key("sentences"));
    }

    #[test]
    fn test_empty_text() {
        let result = run("   ", json!({}));
        assert!(!result.processed());
        assert_eq!(result.result["polarity"].as_f64(), Some(0.0));
        assert_eq!(result.result["subjectivity"].as_f64(), Some(0.0));
        assert_eq!(result.result["word_count"], 0);
        assert_eq!(result.result["sentence_count"], 0);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = SentimentLexicon::new(&["rad"], &["meh"], &[], &[]);
        let scorer = SentimentScorer::with_lexicon(Arc::new(lexicon));
        let score = scorer.score("pretty rad", Amplification::SignPreserving);
        assert_eq!(score.polarity, 1.0);
        assert_eq!(score.label(), "positive");
    }
}
