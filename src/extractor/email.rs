use serde::Serialize;

use crate::extractor::{body::extract_body, cleaner::clean_content};
use crate::mail::RawMessage;

pub const NO_SUBJECT: &str = "(No Subject)";

/// Headers and body renditions of a single fetched message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedEmail {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub snippet: String,
    pub plain_body: String,
    pub html_body: String,
}

impl ParsedEmail {
    pub fn from_raw(message: &RawMessage) -> Self {
        let headers = message.headers();
        let header = |name: &str| headers.get(name).unwrap_or_default().to_string();
        let body = message
            .payload
            .as_ref()
            .map(extract_body)
            .unwrap_or_default();

        Self {
            id: message.id.clone(),
            thread_id: message.thread_id.clone(),
            subject: headers.get("subject").unwrap_or(NO_SUBJECT).to_string(),
            from: header("from"),
            to: header("to"),
            date: header("date"),
            snippet: message.snippet.clone().unwrap_or_default(),
            plain_body: body.plain_text,
            html_body: body.html_text,
        }
    }

    /// Cleaned text of the message, capped at `max_length` characters.
    pub fn cleaned_content(&self, max_length: usize) -> String {
        clean_content(&self.html_body, &self.plain_body, max_length)
    }
}
