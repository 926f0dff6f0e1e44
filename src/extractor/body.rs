use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::extractor::{errors::ExtractError, model::ExtractedBody};
use crate::mail::BodyPart;

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";

/// URL-safe alphabet, padding optional.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

/// Recover the plain and HTML renditions of a message payload.
///
/// Parts are visited depth first in document order. When several parts of
/// the same type exist, the last one visited wins. A payload without a
/// `parts` field is a single-part message and is classified by its own MIME
/// type, HTML only for exactly `text/html`.
pub fn extract_body(payload: &BodyPart) -> ExtractedBody {
    let mut body = ExtractedBody::default();

    if payload.parts.is_none() {
        let text = decode_part(payload);
        if payload.mime_type == TEXT_HTML {
            body.html_text = text;
        } else {
            body.plain_text = text;
        }
        return body;
    }

    visit(payload, &mut body);
    body
}

fn visit(part: &BodyPart, body: &mut ExtractedBody) {
    match part.mime_type.as_str() {
        TEXT_PLAIN if part.data().is_some() => body.plain_text = decode_part(part),
        TEXT_HTML if part.data().is_some() => body.html_text = decode_part(part),
        _ if part.is_multipart() => {
            for child in part.parts.iter().flatten() {
                visit(child, body);
            }
        }
        _ => {}
    }
}

/// Decoded text of a leaf part. Bad base64 degrades to an empty string.
fn decode_part(part: &BodyPart) -> String {
    let Some(data) = part.data() else {
        return String::new();
    };

    match decode_base64url(data) {
        Ok(bytes) => decode_text(&bytes, part_charset(part).as_deref()),
        Err(err) => {
            warn!(
                part_id = ?part.part_id,
                mime_type = %part.mime_type,
                "Failed to decode body part: {}",
                err
            );
            String::new()
        }
    }
}

/// Decode Gmail's base64url payload encoding. Embedded whitespace from
/// line-wrapped payloads is ignored.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>, ExtractError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(BASE64URL.decode(compact)?)
}

/// Bytes to text in the given charset (UTF-8 when unknown). Malformed
/// sequences become U+FFFD instead of failing.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);

    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Replaced malformed {} sequences in body part", used.name());
    }
    decoded.into_owned()
}

fn part_charset(part: &BodyPart) -> Option<String> {
    let headers = part.header_map();
    let content_type = headers.get("content-type")?;
    CHARSET_REGEX
        .captures(content_type)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_lowercase())
}
