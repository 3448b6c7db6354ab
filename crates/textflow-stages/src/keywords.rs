//! Frequency-based keyword extraction with an optional capitalization
//! heuristic for named entities.

use crate::lexicon::{self, KeywordLexicon};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use textflow_core::params::{self, Params};
use textflow_core::{Stage, StageError, StageResult};

static CANDIDATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{2,}\b").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());
static CAPITALIZED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)*\b").unwrap());

pub const DEFAULT_TOP_N: i64 = 10;
pub const MAX_TOP_N: i64 = 50;
pub const MIN_WORD_LENGTH: i64 = 2;
const MAX_WORD_LENGTH: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOptions {
    /// Number of keywords to return, `1..=50`
    pub top_n: usize,
    pub extract_named_entities: bool,
    /// Shortest keyword kept; never below 2
    pub min_word_length: usize,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N as usize,
            extract_named_entities: false,
            min_word_length: MIN_WORD_LENGTH as usize,
        }
    }
}

impl KeywordOptions {
    pub fn from_params(params: &Params) -> Self {
        Self {
            top_n: params::clamped(params, "top_n", DEFAULT_TOP_N, 1, MAX_TOP_N),
            extract_named_entities: params::flag(params, "extract_named_entities"),
            min_word_length: params::clamped(
                params,
                "min_word_length",
                MIN_WORD_LENGTH,
                MIN_WORD_LENGTH,
                MAX_WORD_LENGTH,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub phrase: String,
    /// Share of all candidate tokens, in percent, two decimals
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub struct KeywordExtractor {
    lexicon: Arc<KeywordLexicon>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub const NAME: &'static str = "keyword_extractor";

    pub fn new() -> Self {
        Self::with_lexicon(lexicon::keyword_lexicon())
    }

    pub fn with_lexicon(lexicon: Arc<KeywordLexicon>) -> Self {
        Self { lexicon }
    }

    /// Top keywords by count; equal counts keep first-occurrence order.
    pub fn extract_keywords(&self, text: &str, options: &KeywordOptions) -> Vec<Keyword> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = CANDIDATE.find_iter(&lowered).map(|m| m.as_str()).collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            if self.lexicon.stop_words.contains(*token)
                || token.chars().count() < options.min_word_length
            {
                continue;
            }
            match slots.get(token) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(*token, counts.len());
                    counts.push((*token, 1));
                }
            }
        }

        // stable sort, so ties stay in first-occurrence order
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = tokens.len() as f64;
        counts
            .into_iter()
            .take(options.top_n)
            .map(|(phrase, count)| Keyword {
                phrase: phrase.to_string(),
                score: round2(count as f64 / total * 100.0),
            })
            .collect()
    }

    /// Runs of capitalized words, minus common sentence openers
    pub fn extract_named_entities(&self, text: &str) -> Vec<NamedEntity> {
        CAPITALIZED_RUN
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|phrase| {
                phrase.chars().count() > 1 && !self.lexicon.entity_exclusions.contains(*phrase)
            })
            .map(|phrase| NamedEntity {
                text: phrase.to_string(),
                kind: "entity".to_string(),
            })
            .collect()
    }
}

impl Stage for KeywordExtractor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Extracts keywords and key phrases from text using basic text analysis."
    }

    fn process(&self, text: &str, params: &Params) -> Result<StageResult, StageError> {
        let text = text.trim();
        if text.is_empty() {
            let result = StageResult::from_json(
                Self::NAME,
                json!({
                    "keywords": [],
                    "named_entities": [],
                    "text_length": 0,
                    "word_count": 0,
                }),
            )?;
            return Ok(result.skipped("Empty input text"));
        }

        let options = KeywordOptions::from_params(params);
        let keywords = self.extract_keywords(text, &options);
        let named_entities = if options.extract_named_entities {
            self.extract_named_entities(text)
        } else {
            Vec::new()
        };

        StageResult::from_json(
            Self::NAME,
            json!({
                "keywords": keywords,
                "named_entities": named_entities,
                "text_length": text.chars().count(),
                "word_count": WORD.find_iter(text).count(),
            }),
        )
    }
}

/// Two decimals, exact ties to even
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
