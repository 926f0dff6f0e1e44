use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE},
};
use serde::{Deserialize, Serialize};

use crate::mail::errors::MailError;

/// A plain-text message ready to hand to the provider's send endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    /// `Message-ID` of the message being replied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl OutboundMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    /// Thread the message as a reply.
    pub fn replying_to(mut self, message_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        self.in_reply_to = Some(message_id.into());
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), MailError> {
        if self.to.trim().is_empty() {
            return Err(MailError::InvalidMessage("recipient is empty".to_string()));
        }

        let header_fields = [
            ("to", Some(self.to.as_str())),
            ("subject", Some(self.subject.as_str())),
            ("cc", self.cc.as_deref()),
            ("bcc", self.bcc.as_deref()),
            ("in_reply_to", self.in_reply_to.as_deref()),
        ];
        for (field, value) in header_fields {
            if let Some(value) = value
                && value.contains(['\r', '\n'])
            {
                return Err(MailError::InvalidMessage(format!(
                    "line break in header field '{}'",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Render as an RFC 5322 message with a UTF-8 text/plain body.
    pub fn to_rfc5322(&self) -> Result<String, MailError> {
        self.validate()?;

        let mut message = String::new();
        message.push_str(&format!("To: {}\r\n", self.to.trim()));
        if let Some(cc) = &self.cc {
            message.push_str(&format!("Cc: {}\r\n", cc.trim()));
        }
        if let Some(bcc) = &self.bcc {
            message.push_str(&format!("Bcc: {}\r\n", bcc.trim()));
        }
        message.push_str(&format!("Subject: {}\r\n", encode_header_value(&self.subject)));
        if let Some(parent) = &self.in_reply_to {
            message.push_str(&format!("In-Reply-To: {}\r\n", parent));
            message.push_str(&format!("References: {}\r\n", parent));
        }
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
        message.push_str("Content-Transfer-Encoding: 8bit\r\n");
        message.push_str("\r\n");
        message.push_str(&self.body.replace("\r\n", "\n").replace('\n', "\r\n"));

        Ok(message)
    }

    /// The base64url form the Gmail API expects in the `raw` field.
    pub fn encode_raw(&self) -> Result<String, MailError> {
        Ok(URL_SAFE.encode(self.to_rfc5322()?.as_bytes()))
    }
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}
