use serde_json::{json, Map, Value};
use textflow_core::params::{self, Params};
use textflow_core::{Stage, StageError, StageResult};

const PREVIEW_CHARS: usize = 100;

/// Independent case/shape transformations; each flag is applied to the
/// original text, never to another flag's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub to_upper: bool,
    pub to_lower: bool,
    pub title_case: bool,
    pub reverse: bool,
    pub strip: bool,
}

impl TransformOptions {
    pub fn from_params(params: &Params) -> Self {
        Self {
            to_upper: params::flag(params, "to_upper"),
            to_lower: params::flag(params, "to_lower"),
            title_case: params::flag(params, "title_case"),
            reverse: params::flag(params, "reverse"),
            strip: params::flag(params, "strip"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextTransformer;

impl TextTransformer {
    pub const NAME: &'static str = "text_processor";

    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, text: &str, options: TransformOptions) -> Map<String, Value> {
        let mut result = Map::new();
        result.insert("original_text".to_string(), json!(preview(text)));
        result.insert("length".to_string(), json!(text.chars().count()));
        result.insert("word_count".to_string(), json!(text.split_whitespace().count()));
        result.insert("line_count".to_string(), json!(line_count(text)));

        // (flag, key, output) in transformed_text precedence order
        let transforms: [(bool, &str, fn(&str) -> String); 5] = [
            (options.to_upper, "uppercase", |t| t.to_uppercase()),
            (options.to_lower, "lowercase", |t| t.to_lowercase()),
            (options.title_case, "title_case", title_case),
            (options.reverse, "reversed", |t| t.chars().rev().collect()),
            (options.strip, "stripped", |t| t.trim().to_string()),
        ];

        let mut transformed_text = None;
        for (enabled, key, apply) in transforms {
            if !enabled {
                continue;
            }
            let output = apply(text);
            if transformed_text.is_none() {
                transformed_text = Some(output.clone());
            }
            result.insert(key.to_string(), Value::String(output));
        }

        result.insert(
            "transformed_text".to_string(),
            Value::String(transformed_text.unwrap_or_else(|| text.to_string())),
        );
        result
    }
}

impl Stage for TextTransformer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Performs basic text processing operations like case conversion and whitespace handling."
    }

    fn process(&self, text: &str, params: &Params) -> Result<StageResult, StageError> {
        let options = TransformOptions::from_params(params);
        StageResult::from_json(Self::NAME, Value::Object(self.transform(text, options)))
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Lines split on every Unicode line boundary; `\r\n` is one break and a
/// trailing break does not open an empty line
fn line_count(text: &str) -> usize {
    let mut lines = 0;
    let mut open = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if is_line_break(c) {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            lines += 1;
            open = false;
        } else {
            open = true;
        }
    }
    if open {
        lines += 1;
    }
    lines
}

/// Upper-case a letter that follows a non-letter, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}
