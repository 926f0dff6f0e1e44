use async_trait::async_trait;

use crate::mail::{
    errors::MailError,
    outbound::OutboundMessage,
    types::{MessageRef, RawMessage},
};

/// The mailbox operations the digest pipeline depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailAccess: Send + Sync {
    /// Run a provider search query, most recent first, at most `max_results`.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<MessageRef>, MailError>;

    /// Fetch a full message. Unknown ids yield `MailError::NotFound`.
    async fn fetch(&self, id: &str) -> Result<RawMessage, MailError>;

    /// Send a prepared message and return the reference of the sent copy.
    async fn send(&self, message: &OutboundMessage) -> Result<MessageRef, MailError>;
}
