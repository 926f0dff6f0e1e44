pub mod body;
pub mod boilerplate;
pub mod cleaner;
pub mod email;
pub mod errors;
pub mod model;

#[cfg(test)]
mod tests;

pub use body::extract_body;
pub use cleaner::{clean_content, strip_html};
pub use email::{NO_SUBJECT, ParsedEmail};
pub use errors::ExtractError;
pub use model::{
    DEFAULT_MAX_CONTENT_LENGTH, ExtractedBody, TRUNCATION_MARKER, normalize_whitespace,
    truncate_content,
};
