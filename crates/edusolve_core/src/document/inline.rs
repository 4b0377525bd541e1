//! Inline markup: **bold**, *italic* and backtick code tokens.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*.*?\*\*|\*.*?\*").expect("valid emphasis regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    Bold { text: String },
    Italic { text: String },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Inline::Bold { text: text.into() }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Inline::Italic { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Inline::Text { text } | Inline::Bold { text } | Inline::Italic { text } => text,
        }
    }
}

/// Split a line into literal, bold and italic spans.
///
/// Double markers are tested before single ones so `**x**` never reads as a
/// nested italic. A match with nothing between its markers stays literal.
pub fn resolve_emphasis(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in EMPHASIS.find_iter(line) {
        push_text(&mut spans, &line[last..m.start()]);
        let part = m.as_str();
        if part.len() > 4 && part.starts_with("**") && part.ends_with("**") {
            spans.push(Inline::bold(&part[2..part.len() - 2]));
        } else if part.len() > 2 && part.starts_with('*') && part.ends_with('*') {
            spans.push(Inline::italic(&part[1..part.len() - 1]));
        } else {
            push_text(&mut spans, part);
        }
        last = m.end();
    }
    push_text(&mut spans, &line[last..]);

    spans
}

fn push_text(spans: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text { text: prev }) = spans.last_mut() {
        prev.push_str(text);
    } else {
        spans.push(Inline::text(text));
    }
}

/// Concatenate spans back into unstyled text.
pub fn plain_text(spans: &[Inline]) -> String {
    spans.iter().map(Inline::as_str).collect()
}

/// Segment of a backtick line. Odd split positions are highlighted tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeSegment {
    Plain { text: String },
    Token { text: String },
}

impl CodeSegment {
    pub fn as_str(&self) -> &str {
        match self {
            CodeSegment::Plain { text } | CodeSegment::Token { text } => text,
        }
    }
}

/// Naive inline-code splitter: no nesting, no fences.
pub fn split_code(line: &str) -> Vec<CodeSegment> {
    line.split('`')
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            if i % 2 == 1 {
                CodeSegment::Token {
                    text: part.to_string(),
                }
            } else {
                CodeSegment::Plain {
                    text: part.to_string(),
                }
            }
        })
        .collect()
}
