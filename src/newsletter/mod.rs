pub mod aggregator;
pub mod digest;
pub mod senders;
pub mod window;

pub use aggregator::{
    DEFAULT_HOURS_BACK, DigestOptions, fetch_newsletters, fetch_newsletters_at, read_message,
};
pub use digest::{NewsletterDigest, NewsletterRecord, SenderGroups, SenderNewsletters};
pub use senders::{DEFAULT_SENDERS, NewsletterSender, default_sender_addresses, sender_display_name};
pub use window::LookbackWindow;
