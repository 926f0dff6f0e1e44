use kuchiki::ElementData;

/// Substrings of `class`/`id` values that mark footer or share blocks.
pub const FOOTER_MARKERS: [&str; 5] = ["footer", "unsubscribe", "social", "share", "preference"];

/// Lowercase phrases typical of newsletter footers.
pub const BOILERPLATE_PHRASES: [&str; 9] = [
    "unsubscribe",
    "manage preferences",
    "update your preferences",
    "why did i get this",
    "sent to",
    "you received this email",
    "no longer want to receive",
    "email settings",
    "stop receiving",
];

/// Text nodes at least this long are kept even if they mention a phrase.
pub const MAX_SNIPPET_CHARS: usize = 100;

pub fn has_footer_marker(element: &ElementData) -> bool {
    let attrs = element.attributes.borrow();
    ["class", "id"]
        .iter()
        .filter_map(|key| attrs.get(*key))
        .any(contains_footer_marker)
}

fn contains_footer_marker(value: &str) -> bool {
    let lower = value.to_lowercase();
    FOOTER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Short text mentioning one of the footer phrases.
pub fn is_boilerplate_snippet(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.chars().count() < MAX_SNIPPET_CHARS
        && BOILERPLATE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
