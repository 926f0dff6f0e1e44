pub mod access;
pub mod backoff;
pub mod client;
pub mod errors;
pub mod outbound;
pub mod types;

pub use access::MailAccess;
#[cfg(test)]
pub use access::MockMailAccess;
pub use client::GmailClient;
pub use errors::MailError;
pub use outbound::OutboundMessage;
pub use types::{BodyPart, Header, HeaderMap, MessageRef, PartBody, RawMessage};
