use serde::{Serialize, Serializer};

use crate::newsletter::window::LookbackWindow;

/// One cleaned newsletter issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsletterRecord {
    pub id: String,
    pub subject: String,
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderNewsletters {
    pub sender: String,
    pub newsletters: Vec<NewsletterRecord>,
}

/// Sender to records mapping in processing order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderGroups(Vec<SenderNewsletters>);

impl SenderGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sender's records. Empty groups are not recorded.
    pub fn push(&mut self, sender: impl Into<String>, newsletters: Vec<NewsletterRecord>) {
        if newsletters.is_empty() {
            return;
        }
        self.0.push(SenderNewsletters {
            sender: sender.into(),
            newsletters,
        });
    }

    pub fn get(&self, sender: &str) -> Option<&[NewsletterRecord]> {
        self.0
            .iter()
            .find(|group| group.sender == sender)
            .map(|group| group.newsletters.as_slice())
    }

    pub fn senders(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|group| group.sender.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SenderNewsletters> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.0.iter().map(|group| group.newsletters.len()).sum()
    }
}

impl Serialize for SenderGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|group| (&group.sender, &group.newsletters)),
        )
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsletterDigest {
    pub date_range: String,
    pub hours_back: u32,
    pub total_emails: usize,
    pub newsletters_by_sender: SenderGroups,
}

impl NewsletterDigest {
    pub fn new(window: &LookbackWindow, groups: SenderGroups) -> Self {
        Self {
            date_range: window.label(),
            hours_back: window.hours_back,
            total_emails: groups.total_records(),
            newsletters_by_sender: groups,
        }
    }
}
