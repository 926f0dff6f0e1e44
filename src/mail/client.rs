use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, header::RETRY_AFTER};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::mail::{
    access::MailAccess,
    backoff::calculate_backoff_delay,
    errors::MailError,
    outbound::OutboundMessage,
    types::{MessageList, MessageRef, RawMessage},
};

const USER_AGENT: &str = "gazette/0.1";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(500);
/// Upper bound on a server supplied `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 60;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_id: Option<&'a str>,
}

/// Gmail REST client for the signed-in user (`users/me`).
#[derive(Clone)]
pub struct GmailClient {
    http: Client,
    base_url: Url,
    access_token: String,
    max_attempts: u32,
    base_backoff: Duration,
}

impl GmailClient {
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self, MailError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(MailError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let http = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(MailError::from_reqwest_error)?;

        Ok(Self {
            http,
            base_url,
            access_token: access_token.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        Self::new(config.gmail_api_base(), config.access_token())
    }

    /// Override the retry policy. `max_attempts` counts the first try.
    pub fn with_retry(mut self, max_attempts: u32, base_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_backoff = base_backoff;
        self
    }

    fn messages_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["gmail", "v1", "users", "me", "messages"])
                .extend(segments);
        }
        url
    }

    async fn execute<T, F>(&self, resource: &str, build: F) -> Result<T, MailError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.execute_once(resource, build()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.should_retry() && attempt < self.max_attempts => {
                    let delay = match &err {
                        MailError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS)),
                        _ => calculate_backoff_delay(attempt - 1, self.base_backoff),
                    };
                    warn!(
                        "Request for {} failed (attempt {}/{}): {}; retrying in {:?}",
                        resource, attempt, self.max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn execute_once<T: DeserializeOwned>(
        &self,
        resource: &str,
        request: RequestBuilder,
    ) -> Result<T, MailError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(MailError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(MailError::from_status(status, resource, retry_after));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MailError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MailAccess for GmailClient {
    #[instrument(skip_all, fields(query = %query, max_results = max_results))]
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<MessageRef>, MailError> {
        let url = self.messages_url(&[]);
        let max = max_results.to_string();
        let list: MessageList = self
            .execute("messages", || {
                self.http
                    .get(url.clone())
                    .query(&[("q", query), ("maxResults", max.as_str())])
            })
            .await?;

        debug!(
            "Search returned {} messages (estimate: {:?})",
            list.messages.len(),
            list.result_size_estimate
        );

        Ok(list
            .messages
            .into_iter()
            .take(max_results as usize)
            .collect())
    }

    #[instrument(skip_all, fields(message_id = %id))]
    async fn fetch(&self, id: &str) -> Result<RawMessage, MailError> {
        let url = self.messages_url(&[id]);
        self.execute(id, || {
            self.http
                .get(url.clone())
                .query(&[("format", "full")])
        })
        .await
    }

    #[instrument(skip_all, fields(to = %message.to))]
    async fn send(&self, message: &OutboundMessage) -> Result<MessageRef, MailError> {
        let raw = message.encode_raw()?;
        let url = self.messages_url(&["send"]);
        let body = SendRequest {
            raw,
            thread_id: message.thread_id.as_deref(),
        };
        // Sends are never retried.
        self.execute_once("send", self.http.post(url).json(&body))
            .await
    }
}
