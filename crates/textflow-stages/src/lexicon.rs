//! Fixed word sets used by the sentiment and keyword stages.
//!
//! The sets are built once per process and handed to stages behind an
//! `Arc`; stages never mutate them.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "awesome",
    "outstanding", "superb", "perfect", "best", "love", "like", "enjoy", "happy",
    "joy", "pleased", "satisfied", "delighted", "brilliant", "fabulous", "stellar",
    "terrific", "marvelous", "exceptional", "splendid", "incredible", "admirable",
    "charming", "delicious", "enjoyable", "favorable", "friendly", "fun", "glad",
    "graceful", "grateful", "honest", "kind", "lovely", "lucky", "nice", "pleasant",
    "proud", "relaxed", "successful", "thrilled", "upbeat", "vibrant", "winning",
    "witty", "yay", "yes", "yummy", "zealous", "adore", "bliss", "celebrate",
    "cheer", "cheerful", "delight", "ecstatic", "elated", "euphoric", "exhilarated",
    "festive", "gleeful", "jolly", "jovial", "jubilant", "merry", "optimistic",
    "peaceful", "playful", "positive", "radiant", "sunny", "victorious",
];

// "not" is also in NEGATIONS.
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "poor", "disappointing",
    "hate", "dislike", "sad", "unhappy", "angry", "annoyed", "frustrated",
    "miserable", "depressed", "upset", "displeased", "anxious", "appalling",
    "atrocious", "boring", "broken", "cancer", "crash", "cruel", "cry", "damage",
    "damn", "death", "defeated", "defective", "deny", "deprived", "desperate",
    "difficult", "dirty", "disaster", "disgusting", "failure", "fear", "feeble",
    "fool", "foul", "frighten", "gross", "guilty", "hard", "harsh", "hideous",
    "hurt", "ill", "inferior", "injure", "jealous", "lose", "lousy", "mess",
    "miss", "nasty", "naughty", "negative", "nervous", "not", "pain",
    "pessimistic", "repulsive", "scare", "selfish", "sick", "sickening", "stingy",
    "stop", "stress", "trouble", "ugly", "unfair", "wrong", "stupid",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "absolutely", "completely", "totally",
    "utterly", "exceptionally", "incredibly", "remarkably", "particularly",
    "especially", "enormously", "hugely", "unusually", "uncommonly", "decidedly",
    "highly", "truly", "genuinely", "certainly", "undoubtedly", "definitely",
    "surely", "assuredly", "drastically", "exceedingly", "extraordinarily",
    "immensely", "intensely", "powerfully", "profoundly", "strikingly",
    "tremendously", "vastly",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nowhere",
    "hardly", "scarcely", "barely", "doesnt", "isnt", "wasnt", "shouldnt",
    "wouldnt", "couldnt", "wont", "cant", "dont",
];

const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of",
    "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then",
    "once", "here", "there", "when", "where", "why", "how", "all", "any", "both",
    "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "couldn",
    "didn", "doesn", "hadn", "hasn", "haven", "isn", "mightn", "mustn", "needn",
    "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Capitalized words that start sentences too often to count as entities
const ENTITY_EXCLUSIONS: &[&str] = &[
    "The", "And", "For", "But", "Or", "Not", "With", "This", "That",
];

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Word lists driving [`SentimentScorer`](crate::SentimentScorer)
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
    pub intensifiers: HashSet<String>,
    pub negations: HashSet<String>,
}

impl SentimentLexicon {
    pub fn new(
        positive: &[&str],
        negative: &[&str],
        intensifiers: &[&str],
        negations: &[&str],
    ) -> Self {
        Self {
            positive: word_set(positive),
            negative: word_set(negative),
            intensifiers: word_set(intensifiers),
            negations: word_set(negations),
        }
    }
}

/// Word lists driving [`KeywordExtractor`](crate::KeywordExtractor)
#[derive(Debug, Clone)]
pub struct KeywordLexicon {
    pub stop_words: HashSet<String>,
    pub entity_exclusions: HashSet<String>,
}

impl KeywordLexicon {
    pub fn new(stop_words: &[&str], entity_exclusions: &[&str]) -> Self {
        Self {
            stop_words: word_set(stop_words),
            entity_exclusions: word_set(entity_exclusions),
        }
    }
}

static SENTIMENT: Lazy<Arc<SentimentLexicon>> = Lazy::new(|| {
    Arc::new(SentimentLexicon::new(
        POSITIVE_WORDS,
        NEGATIVE_WORDS,
        INTENSIFIERS,
        NEGATIONS,
    ))
});

static KEYWORDS: Lazy<Arc<KeywordLexicon>> =
    Lazy::new(|| Arc::new(KeywordLexicon::new(STOP_WORDS, ENTITY_EXCLUSIONS)));

/// Process-wide default sentiment lexicon
pub fn sentiment_lexicon() -> Arc<SentimentLexicon> {
    Arc::clone(&SENTIMENT)
}

/// Process-wide default stop words and entity exclusions
pub fn keyword_lexicon() -> Arc<KeywordLexicon> {
    Arc::clone(&KEYWORDS)
}
