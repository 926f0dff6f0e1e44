use thiserror::Error;

/// Failures inside extraction. These are logged and degrade to empty text;
/// none of them crosses the public `extract_body`/`clean_content` boundary.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("html parse error: {0}")]
    Parse(String),
}
