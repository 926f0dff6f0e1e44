use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unauthorized: access token missing or expired")]
    Unauthorized,

    #[error("message not found: {0}")]
    NotFound(String),

    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("http error {status}")]
    Http {
        status: reqwest::StatusCode,
        retriable: bool,
    },

    #[error("request timeout")]
    Timeout,

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid outbound message: {0}")]
    InvalidMessage(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl MailError {
    pub fn should_retry(&self) -> bool {
        match self {
            // Fatal errors - don't retry
            Self::InvalidUrl(_) => false,
            Self::Unauthorized => false,
            Self::NotFound(_) => false,
            Self::Decode(_) => false,
            Self::InvalidMessage(_) => false,
            Self::Http { retriable, .. } => *retriable,

            // Temporary errors - retry
            Self::RateLimited { .. } => true,
            Self::Timeout => true,
            Self::Io(_) => true,
            Self::Unknown(_) => true,
        }
    }

    /// Map a non-success status. `resource` names what was requested and
    /// ends up in `NotFound`.
    pub fn from_status(
        status: reqwest::StatusCode,
        resource: &str,
        retry_after: Option<u64>,
    ) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized,
            404 => Self::NotFound(resource.to_string()),
            429 => Self::RateLimited { retry_after },
            _ => Self::Http {
                status,
                retriable: status.is_server_error(),
            },
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_connect() || err.is_request() {
            Self::Io(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}
