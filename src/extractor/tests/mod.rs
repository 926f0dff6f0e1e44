use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use std::fs;

use crate::extractor::{
    DEFAULT_MAX_CONTENT_LENGTH, ParsedEmail, TRUNCATION_MARKER, clean_content, extract_body,
};
use crate::mail::{BodyPart, Header, RawMessage};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture")
}

fn newsletter_message(html: &str, plain: &str) -> RawMessage {
    let mut payload = BodyPart::container(
        "multipart/alternative",
        vec![
            BodyPart::leaf("text/plain", URL_SAFE.encode(plain)),
            BodyPart::leaf("text/html", URL_SAFE.encode(html)),
        ],
    );
    payload.headers = vec![
        Header::new("From", "The Neuron <newsletter@theneurondaily.com>"),
        Header::new("Subject", "Open models catch up"),
        Header::new("Date", "Mon, 13 Oct 2025 11:02:00 +0000"),
    ];
    RawMessage {
        id: "18c0ffee".to_string(),
        thread_id: "18c0ffee".to_string(),
        payload: Some(payload),
        ..Default::default()
    }
}

#[test]
fn test_clean_newsletter_fixture() {
    let html = fixture("newsletter.html");
    let content = clean_content(&html, "", DEFAULT_MAX_CONTENT_LENGTH);

    assert!(content.starts_with("[View in browser](https://theneurondaily.com/p/web)"));
    assert!(content.contains("\n\nThe Daily Neuron\n"));
    assert!(content.contains("\n\nOpen models catch up\n"));
    assert!(content.contains("[full breakdown](https://example.com/open-models)"));
    assert!(content.contains("Robotics startup raises a Series B."));
    assert!(content.ends_with("Back to top"));

    // Noise and footer blocks
    assert!(!content.contains("trackOpen"));
    assert!(!content.contains("font-family"));
    assert!(!content.contains("LinkedIn"));
    assert!(!content.contains("Share The Neuron"));
    assert!(!content.contains("You received this email"));
    assert!(!content.contains("Manage preferences"));
    assert!(!content.contains("Market St"));
}

#[test]
fn test_clean_plain_fixture() {
    let plain = fixture("plain_only.txt");
    let content = clean_content("", &plain, DEFAULT_MAX_CONTENT_LENGTH);

    assert_eq!(
        content,
        "LAST WEEK IN AI\n\nTop story: a lab released a new reasoning model.\n\nAlso: chip export rules changed."
    );
}

#[test]
fn test_parsed_email_pipeline() {
    let html = fixture("newsletter.html");
    let raw = newsletter_message(&html, "plain fallback");

    let parsed = ParsedEmail::from_raw(&raw);
    assert_eq!(parsed.subject, "Open models catch up");
    assert_eq!(parsed.plain_body, "plain fallback");
    assert_eq!(parsed.html_body, html);

    let content = parsed.cleaned_content(DEFAULT_MAX_CONTENT_LENGTH);
    assert!(content.contains("Robotics startup raises a Series B."));
    assert!(!content.contains("plain fallback"));
}

#[test]
fn test_pipeline_truncates_long_newsletters() {
    let paragraph = "<p>A model shipped. ".to_string() + &"word ".repeat(40) + "</p>";
    let html = paragraph.repeat(50);
    let raw = newsletter_message(&html, "");

    let content = ParsedEmail::from_raw(&raw).cleaned_content(500);
    assert!(content.ends_with(TRUNCATION_MARKER));
    assert_eq!(
        content.chars().count(),
        500 + TRUNCATION_MARKER.chars().count()
    );
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let body = extract_body(&BodyPart::leaf("text/html", URL_SAFE.encode(html)));

    let content = clean_content(&body.html_text, &body.plain_text, DEFAULT_MAX_CONTENT_LENGTH);
    assert_eq!(content, "Unclosed tags\nMore content");
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::extractor::normalize_whitespace;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_clean_never_panics(html in ".*", plain in ".*", max in 0usize..2_000) {
            let content = clean_content(&html, &plain, max);
            prop_assert!(content.chars().count() <= max + TRUNCATION_MARKER.chars().count());
        }

        #[test]
        fn test_clean_is_idempotent_on_own_output(html in ".{0,2000}") {
            let once = clean_content(&html, "", DEFAULT_MAX_CONTENT_LENGTH);
            prop_assert_eq!(clean_content("", &once, DEFAULT_MAX_CONTENT_LENGTH), once);
        }

        #[test]
        fn test_clean_is_idempotent_on_newsletter_markup(
            html in r##"(<p>|</p>|<h2>|</h2>|<a href="https://x.io/p">|<a href="#top">|</a>|<div class="footer">|</div>|<br>|[a-z ]{1,12}|  |\n|unsubscribe)*"##
        ) {
            let once = clean_content(&html, "", DEFAULT_MAX_CONTENT_LENGTH);
            prop_assert_eq!(clean_content("", &once, DEFAULT_MAX_CONTENT_LENGTH), once);
        }

        #[test]
        fn test_normalize_is_idempotent(text in "[ a-z\t\n]{0,200}") {
            let once = normalize_whitespace(&text);
            prop_assert_eq!(normalize_whitespace(&once), once);
        }

        #[test]
        fn test_extract_body_never_panics(data in "[A-Za-z0-9_=*-]{0,64}", mime in "(text/plain|text/html|image/png)") {
            let part = BodyPart::container("multipart/mixed", vec![BodyPart::leaf(&mime, data)]);
            let _ = extract_body(&part);
        }
    }
}
