//! Configuration handling for the digest runner.
//!
//! Everything is read from environment variables with development defaults,
//! the same way for the binary and for tests. OAuth token acquisition lives
//! outside this crate; whatever performs it is expected to export a fresh
//! bearer token as `GMAIL_ACCESS_TOKEN` before the runner starts.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::extractor::DEFAULT_MAX_CONTENT_LENGTH;
use crate::newsletter::DEFAULT_HOURS_BACK;

/// Environment variable names. Public so tests and wrappers can refer to them.
pub const ENV_GMAIL_API_BASE: &str = "GMAIL_API_BASE";
pub const ENV_GMAIL_ACCESS_TOKEN: &str = "GMAIL_ACCESS_TOKEN";
pub const ENV_HOURS_BACK: &str = "DIGEST_HOURS_BACK";
pub const ENV_MAX_CONTENT_LENGTH: &str = "DIGEST_MAX_CONTENT_LENGTH";
pub const ENV_SENDERS: &str = "DIGEST_SENDERS";

/// Default development values used when environment variables are absent.
const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

/// One year; larger windows are almost certainly a typo.
const MAX_HOURS_BACK: u32 = 8760;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    gmail_api_base: String,
    access_token: String,
    hours_back: u32,
    max_content_length: usize,
    senders: Option<Vec<String>>,
}

impl Config {
    /// Create a new config explicitly. `senders = None` means the curated list.
    pub fn new(
        gmail_api_base: impl Into<String>,
        access_token: impl Into<String>,
        hours_back: u32,
        max_content_length: usize,
        senders: Option<Vec<String>>,
    ) -> Self {
        Self {
            gmail_api_base: gmail_api_base.into(),
            access_token: access_token.into(),
            hours_back,
            max_content_length,
            senders,
        }
    }

    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gmail_api_base =
            env::var(ENV_GMAIL_API_BASE).unwrap_or_else(|_| DEFAULT_GMAIL_API_BASE.to_string());
        let access_token = env::var(ENV_GMAIL_ACCESS_TOKEN).unwrap_or_default();

        let hours_back = match env::var(ENV_HOURS_BACK) {
            Ok(raw) => parse_hours_back(&raw)?,
            Err(_) => DEFAULT_HOURS_BACK,
        };

        let max_content_length = match env::var(ENV_MAX_CONTENT_LENGTH) {
            Ok(raw) => parse_max_content_length(&raw)?,
            Err(_) => DEFAULT_MAX_CONTENT_LENGTH,
        };

        let senders = env::var(ENV_SENDERS).ok().and_then(|raw| parse_senders(&raw));

        Ok(Self {
            gmail_api_base,
            access_token,
            hours_back,
            max_content_length,
            senders,
        })
    }

    /// Base URL of the Gmail REST API (overridden in tests).
    pub fn gmail_api_base(&self) -> &str {
        &self.gmail_api_base
    }
    /// OAuth bearer token for the Gmail API.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
    pub fn hours_back(&self) -> u32 {
        self.hours_back
    }
    /// Per-message cap applied by the content cleaner.
    pub fn max_content_length(&self) -> usize {
        self.max_content_length
    }
    /// Explicit sender list, or `None` to use the curated defaults.
    pub fn senders(&self) -> Option<&[String]> {
        self.senders.as_deref()
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        // not `Default` impl yet to keep explicit semantics
        Self::new(
            DEFAULT_GMAIL_API_BASE,
            "",
            DEFAULT_HOURS_BACK,
            DEFAULT_MAX_CONTENT_LENGTH,
            None,
        )
    }
}

fn parse_hours_back(raw: &str) -> Result<u32, ConfigError> {
    let hours: u32 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: ENV_HOURS_BACK,
        reason: format!("expected a positive integer, got '{}'", raw),
    })?;
    if hours == 0 || hours > MAX_HOURS_BACK {
        return Err(ConfigError::InvalidValue {
            field: ENV_HOURS_BACK,
            reason: format!("must be between 1 and {}, got {}", MAX_HOURS_BACK, hours),
        });
    }
    Ok(hours)
}

fn parse_max_content_length(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue {
            field: ENV_MAX_CONTENT_LENGTH,
            reason: format!("expected a positive integer, got '{}'", raw),
        }),
        Ok(n) => Ok(n),
    }
}

/// Comma separated addresses; blank entries are ignored and an all-blank
/// value means "use the defaults".
fn parse_senders(raw: &str) -> Option<Vec<String>> {
    let senders: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if senders.is_empty() { None } else { Some(senders) }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
