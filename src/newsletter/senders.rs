/// A curated newsletter source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsletterSender {
    pub key: &'static str,
    pub name: &'static str,
    pub address: &'static str,
}

pub const DEFAULT_SENDERS: [NewsletterSender; 5] = [
    NewsletterSender {
        key: "bens_bites",
        name: "Ben's Bites",
        address: "hello@bensbites.beehiiv.com",
    },
    NewsletterSender {
        key: "the_neuron",
        name: "The Neuron",
        address: "newsletter@theneurondaily.com",
    },
    NewsletterSender {
        key: "the_rundown",
        name: "The Rundown",
        address: "team@rundown.ai",
    },
    NewsletterSender {
        key: "last_week_in_ai",
        name: "Last Week in AI",
        address: "hello@lastweekin.ai",
    },
    NewsletterSender {
        key: "alpha_signal",
        name: "Alpha Signal",
        address: "newsletter@alphasignal.ai",
    },
];

pub fn default_sender_addresses() -> Vec<String> {
    DEFAULT_SENDERS
        .iter()
        .map(|sender| sender.address.to_string())
        .collect()
}

/// Friendly name for a sender address.
///
/// Curated senders use their registered name. Other addresses fall back to
/// the first label of the domain, title-cased (`team@acme.io` -> `Acme`).
/// Input without an `@` is returned unchanged.
pub fn sender_display_name(address: &str) -> String {
    if let Some(sender) = DEFAULT_SENDERS.iter().find(|s| s.address == address) {
        return sender.name.to_string();
    }

    match address.split_once('@') {
        Some((_, domain)) => title_case(domain.split('.').next().unwrap_or_default()),
        None => address.to_string(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
