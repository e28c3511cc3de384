//! Pulls translation and transliteration fields out of free-form model output.
//!
//! Chat models do not always honour the requested JSON format, so the reply
//! goes through an ordered list of extractors. Each one returns `None` when it
//! fills neither field, and the first one that fills at least one field wins.
//! The labelled-line extractor only looks at replies that are not JSON, and
//! the paragraph split is the last resort.

use crate::translator::LineTranslation;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// Keys that may carry the transliteration, in priority order.
const ROMANIZATION_KEYS: &[&str] = &["franco", "romanization", "transliteration"];

/// Keys that may carry the English translation, in priority order.
const TRANSLATION_KEYS: &[&str] = &["english", "translation"];

static FRANCO_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfranco\b\**\s*:\s*\**\s*(.+)").expect("valid regex"));

static ENGLISH_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\benglish\b\**\s*:\s*\**\s*(.+)").expect("valid regex"));

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("valid regex"));

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[a-zA-Z]*\s*\n?(.*?)\n?\s*```$").expect("valid regex")
});

/// A trimmed model reply, parsed as JSON up front when possible.
struct Reply<'a> {
    text: &'a str,
    json: Option<Value>,
}

impl<'a> Reply<'a> {
    fn new(content: &'a str) -> Self {
        let text = content.trim();
        Self {
            text,
            json: parse_json(text),
        }
    }
}

/// A single extraction strategy.
type Extractor = fn(&Reply<'_>) -> Option<LineTranslation>;

/// Strategies in the order they are tried.
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("json", extract_json),
    ("labelled", extract_labelled),
    ("paragraphs", extract_paragraphs),
];

/// Extracts `{translation, romanization}` from a chat completion reply.
///
/// Never fails: content that no strategy understands yields empty fields.
pub fn extract_fields(content: &str) -> LineTranslation {
    let reply = Reply::new(content);

    for &(name, extractor) in EXTRACTORS {
        if let Some(found) = extractor(&reply) {
            debug!("Extracted fields with '{}' strategy", name);
            return found;
        }
    }

    LineTranslation::default()
}

/// Parses the reply as JSON, optionally wrapped in a Markdown code fence.
fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok().or_else(|| {
        let inner = CODE_FENCE.captures(text)?.get(1)?.as_str();
        serde_json::from_str::<Value>(inner.trim()).ok()
    })
}

/// Reads the fields from a JSON object.
fn extract_json(reply: &Reply) -> Option<LineTranslation> {
    let object = reply.json.as_ref()?.as_object()?;

    let first_string = |keys: &[&str]| {
        keys.iter()
            .filter_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or_default()
            .to_string()
    };

    non_empty(LineTranslation {
        translation: first_string(TRANSLATION_KEYS),
        romanization: first_string(ROMANIZATION_KEYS),
    })
}

/// Reads `Franco: ...` and `English: ...` lines.
///
/// Replies that parsed as JSON are left to the JSON extractor.
fn extract_labelled(reply: &Reply) -> Option<LineTranslation> {
    if reply.json.is_some() {
        return None;
    }

    non_empty(LineTranslation {
        translation: capture_value(&ENGLISH_LINE, reply.text),
        romanization: capture_value(&FRANCO_LINE, reply.text),
    })
}

fn capture_value(pattern: &Regex, content: &str) -> String {
    pattern
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// First paragraph is the transliteration, the rest is the translation.
///
/// A single paragraph is taken as the translation alone.
fn extract_paragraphs(reply: &Reply) -> Option<LineTranslation> {
    let content = reply.text;
    let mut segments = BLANK_LINE
        .split(content)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let first = segments.next()?;
    let rest: Vec<&str> = segments.collect();

    if rest.is_empty() {
        return Some(LineTranslation {
            translation: content.to_string(),
            romanization: String::new(),
        });
    }

    Some(LineTranslation {
        translation: rest.join("\n"),
        romanization: first.to_string(),
    })
}

fn non_empty(found: LineTranslation) -> Option<LineTranslation> {
    if found.translation.is_empty() && found.romanization.is_empty() {
        None
    } else {
        Some(found)
    }
}
