use serde::{Deserialize, Serialize};

/// Reference returned by a mailbox search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// One page of `users.messages.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    pub next_page_token: Option<String>,
    pub result_size_estimate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    #[serde(default)]
    pub size: u64,
    /// base64url encoded content, only present on leaf parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,
}

/// A node of the MIME tree. A part carries either `body.data` (leaf) or
/// `parts` (container), possibly neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PartBody>,
    /// `None` and `Some(vec![])` are different: only a missing field marks a
    /// single-part message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<BodyPart>>,
}

impl BodyPart {
    /// Leaf part carrying already-encoded `data`.
    pub fn leaf(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let data = data.into();
        Self {
            mime_type: mime_type.into(),
            body: Some(PartBody {
                size: data.len() as u64,
                data: Some(data),
                attachment_id: None,
            }),
            ..Default::default()
        }
    }

    pub fn container(mime_type: impl Into<String>, parts: Vec<BodyPart>) -> Self {
        Self {
            mime_type: mime_type.into(),
            parts: Some(parts),
            ..Default::default()
        }
    }

    /// Encoded payload, if this part has a non-empty one.
    pub fn data(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.data.as_deref())
            .filter(|data| !data.is_empty())
    }

    pub fn is_multipart(&self) -> bool {
        self.mime_type.starts_with("multipart/")
    }

    pub fn header_map(&self) -> HeaderMap {
        HeaderMap::from_headers(&self.headers)
    }
}

/// Full message as returned by `users.messages.get?format=full`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Epoch millis, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<BodyPart>,
}

impl RawMessage {
    /// Top-level headers of the message (empty when there is no payload).
    pub fn headers(&self) -> HeaderMap {
        self.payload
            .as_ref()
            .map(BodyPart::header_map)
            .unwrap_or_default()
    }
}

/// Case-insensitive header lookup that keeps the order headers were first
/// seen in. Inserting a name that is already present replaces its value in
/// place, so for duplicated headers the last one in the list wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_headers(headers: &[Header]) -> Self {
        let mut map = Self::new();
        for header in headers {
            map.insert(&header.name, &header.value);
        }
        map
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let key = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Lowercased names with their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
