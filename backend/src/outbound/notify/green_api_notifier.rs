//! Reqwest-backed Green API (WhatsApp) notifier.
//!
//! Sends the proof photo by URL to a single group chat. The API token is
//! part of the request path, so endpoints are never logged.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{CompletionNotice, CompletionNotifier, NotifierError};

const DEFAULT_API_BASE: &str = "https://api.green-api.com";

/// Credentials and destination for the Green API.
#[derive(Clone)]
pub struct GreenApiConfig {
    /// Base URL of the API host.
    pub api_base: String,
    /// Instance identifier issued by Green API.
    pub instance_id: String,
    /// Instance token.
    pub api_token: Zeroizing<String>,
    /// Destination chat, e.g. `1203...@g.us`.
    pub chat_id: String,
}

impl GreenApiConfig {
    /// Configuration for the public API host.
    pub fn new(
        instance_id: impl Into<String>,
        api_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            instance_id: instance_id.into(),
            api_token: Zeroizing::new(api_token.into()),
            chat_id: chat_id.into(),
        }
    }

    fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/waInstance{}/sendFileByUrl/{}",
            self.api_base.trim_end_matches('/'),
            self.instance_id,
            self.api_token.as_str()
        ))
    }
}

impl fmt::Debug for GreenApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenApiConfig")
            .field("api_base", &self.api_base)
            .field("instance_id", &self.instance_id)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Construction failures.
#[derive(Debug, thiserror::Error)]
pub enum GreenApiSetupError {
    /// The endpoint could not be formed from the configuration.
    #[error("invalid Green API endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendFileByUrlRequest<'a> {
    chat_id: &'a str,
    url_file: &'a str,
    file_name: &'a str,
    caption: String,
}

/// [`CompletionNotifier`] posting to Green API's `sendFileByUrl`.
pub struct GreenApiNotifier {
    client: Client,
    endpoint: Url,
    chat_id: String,
}

impl GreenApiNotifier {
    /// Build a notifier whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GreenApiSetupError`] for malformed configuration or when the
    /// client cannot be constructed.
    pub fn new(config: &GreenApiConfig, timeout: Duration) -> Result<Self, GreenApiSetupError> {
        let endpoint = config.endpoint()?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            chat_id: config.chat_id.clone(),
        })
    }
}

fn payload<'a>(chat_id: &'a str, notice: &'a CompletionNotice) -> SendFileByUrlRequest<'a> {
    SendFileByUrlRequest {
        chat_id,
        url_file: &notice.photo_url,
        file_name: &notice.file_name,
        caption: notice.caption(),
    }
}

fn map_transport_error(error: reqwest::Error) -> NotifierError {
    // Strip the URL: it carries the API token.
    NotifierError::transport(error.without_url().to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotifierError {
    const PREVIEW_CHAR_LIMIT: usize = 160;
    let preview: String = String::from_utf8_lossy(body)
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    NotifierError::rejected(status.as_u16(), preview)
}

#[async_trait]
impl CompletionNotifier for GreenApiNotifier {
    async fn notify_completion(&self, notice: &CompletionNotice) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload(&self.chat_id, notice))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(
            resident = %notice.resident,
            chore = %notice.chore,
            "completion notice delivered"
        );
        Ok(())
    }
}
