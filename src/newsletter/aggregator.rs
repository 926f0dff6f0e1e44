use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};

use crate::extractor::{DEFAULT_MAX_CONTENT_LENGTH, ParsedEmail};
use crate::mail::{MailAccess, MailError};
use crate::newsletter::{
    digest::{NewsletterDigest, NewsletterRecord, SenderGroups},
    senders::default_sender_addresses,
    window::LookbackWindow,
};

pub const DEFAULT_HOURS_BACK: u32 = 36;
pub const DEFAULT_MAX_PER_SENDER: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestOptions {
    /// Search result cap per sender.
    pub max_per_sender: u32,
    /// Character cap on each cleaned message.
    pub max_content_length: usize,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            max_per_sender: DEFAULT_MAX_PER_SENDER,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

/// Collect newsletters received in the last `hours_back` hours, by the local
/// clock. `None` senders means the curated list.
pub async fn fetch_newsletters(
    mail: &dyn MailAccess,
    hours_back: u32,
    senders: Option<&[String]>,
) -> NewsletterDigest {
    let window = LookbackWindow::now(hours_back);
    fetch_newsletters_at(mail, &window, senders, &DigestOptions::default()).await
}

/// Collect newsletters for an explicit window.
///
/// Senders are processed one at a time in the given order, each address once
/// (repeats keep their first position). A sender whose search or fetch fails
/// is logged and left out; the others still run. Senders without messages
/// are absent from the result.
pub async fn fetch_newsletters_at(
    mail: &dyn MailAccess,
    window: &LookbackWindow,
    senders: Option<&[String]>,
    options: &DigestOptions,
) -> NewsletterDigest {
    let mut senders = match senders {
        Some(senders) => senders.to_vec(),
        None => default_sender_addresses(),
    };
    let mut seen = HashSet::new();
    senders.retain(|sender| seen.insert(sender.clone()));

    info!(
        "Fetching newsletters from {} senders ({})",
        senders.len(),
        window.label()
    );

    let mut groups = SenderGroups::new();
    for sender in &senders {
        match collect_sender(mail, window, sender, options).await {
            Ok(records) => groups.push(sender.as_str(), records),
            Err(e) => error!("Error fetching newsletters from {}: {}", sender, e),
        }
    }

    let digest = NewsletterDigest::new(window, groups);
    info!(
        "Collected {} newsletters from {} senders",
        digest.total_emails,
        digest.newsletters_by_sender.len()
    );
    digest
}

#[instrument(skip_all, fields(sender = %sender))]
async fn collect_sender(
    mail: &dyn MailAccess,
    window: &LookbackWindow,
    sender: &str,
    options: &DigestOptions,
) -> Result<Vec<NewsletterRecord>, MailError> {
    let refs = mail
        .search(&window.query_for(sender), options.max_per_sender)
        .await?;
    debug!("Found {} messages", refs.len());

    let mut records = Vec::with_capacity(refs.len());
    for message_ref in refs {
        let email = match read_message(mail, &message_ref.id).await {
            Ok(email) => email,
            Err(MailError::NotFound(id)) => {
                warn!("Message {} disappeared before it could be read", id);
                continue;
            }
            Err(e) => return Err(e),
        };

        let content = email.cleaned_content(options.max_content_length);
        records.push(NewsletterRecord {
            id: email.id,
            subject: email.subject,
            date: email.date,
            content,
        });
    }

    Ok(records)
}

/// Fetch and parse a single message. Unknown ids surface as `NotFound`.
pub async fn read_message(mail: &dyn MailAccess, id: &str) -> Result<ParsedEmail, MailError> {
    let raw = mail.fetch(id).await?;
    Ok(ParsedEmail::from_raw(&raw))
}
