//! Translation-output shaping.
//!
//! Provider responses may embed `<think>…</think>` spans of intermediate
//! reasoning. The server leaves the tags in place (wrapping their content in
//! an HTML div for its own web client); here they are parsed into discrete
//! segments so each thinking span can be collapsed and expanded on its own.

use std::sync::LazyLock;

use regex::Regex;

static THINK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>(.*?)</think>").unwrap());

/// Wrapper markup the server injects inside think spans for its web client.
static HTML_WRAPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?div[^>]*>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Thinking(String),
}

/// Split a raw translation payload into alternating plain and thinking
/// segments. Whitespace-only fragments are dropped; an unterminated
/// `<think>` is left as literal text.
pub fn parse_segments(output: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in THINK_SPAN.captures_iter(output) {
        let span = caps.get(0).expect("regex has a full match");
        push_text(&mut segments, &output[cursor..span.start()]);

        let inner = HTML_WRAPPER.replace_all(&caps[1], "");
        let inner = inner.trim();
        if !inner.is_empty() {
            segments.push(Segment::Thinking(inner.to_string()));
        }
        cursor = span.end();
    }
    push_text(&mut segments, &output[cursor..]);

    segments
}

fn push_text(segments: &mut Vec<Segment>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        segments.push(Segment::Text(fragment.to_string()));
    }
}
