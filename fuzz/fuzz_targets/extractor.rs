#![no_main]

use libfuzzer_sys::fuzz_target;

use gazette::extractor::{DEFAULT_MAX_CONTENT_LENGTH, clean_content, extract_body};
use gazette::mail::BodyPart;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data).to_string();

    // Cleaning never panics, whatever the markup
    let _ = clean_content(&html, "", DEFAULT_MAX_CONTENT_LENGTH);

    // Arbitrary bytes as an encoded payload degrade to empty text
    let part = BodyPart::container("multipart/mixed", vec![BodyPart::leaf("text/html", html)]);
    let body = extract_body(&part);
    let _ = clean_content(&body.html_text, &body.plain_text, DEFAULT_MAX_CONTENT_LENGTH);
});
