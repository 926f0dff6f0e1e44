use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 50_000;
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated for length...]";

static SPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Plain and HTML renditions recovered from a MIME tree. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedBody {
    pub plain_text: String,
    pub html_text: String,
}

impl ExtractedBody {
    pub fn is_empty(&self) -> bool {
        self.plain_text.is_empty() && self.html_text.is_empty()
    }
}

/// Trim every line, keep at most one blank line in a row, squeeze runs of
/// spaces and trim the result. Idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_empty = false;

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            if !prev_empty {
                lines.push("");
                prev_empty = true;
            }
            continue;
        }
        prev_empty = false;
        lines.push(line);
    }

    let joined = lines.join("\n");
    SPACE_RUN_REGEX.replace_all(&joined, " ").trim().to_string()
}

/// Cut `text` to `max_length` characters and append the truncation marker.
/// The marker itself is not counted against the cap.
pub fn truncate_content(text: String, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}
