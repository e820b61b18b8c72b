use std::time::Duration;

use futures_util::StreamExt;
use glit_logging::{glit_debug, glit_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::decode::{decode_html, decode_html_lossy};
use crate::{FailureKind, FetchError, PageContent};

pub const DEFAULT_USER_AGENT: &str = concat!("glit/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Upper bound for a whole request, body included. Expiry is a `Timeout` failure.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    pub accept: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: None,
        }
    }
}

/// What to do with a body that does not decode cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Fail with `FailureKind::Decode`.
    #[default]
    Strict,
    /// Substitute U+FFFD for malformed sequences and keep the page.
    Lossy,
}

/// Single GET against a URL. Failures come back as values, never panics.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError>;
}

#[async_trait::async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        (**self).fetch(url).await
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
    decoding: DecodePolicy,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            client,
            decoding: DecodePolicy::Strict,
        })
    }

    /// Same client and settings, different decode policy.
    pub fn with_decoding(mut self, decoding: DecodePolicy) -> Self {
        self.decoding = decoding;
        self
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn too_large(&self, url: &str, actual: u64) -> FetchError {
        FetchError::new(
            url,
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.clone())
        .redirect(policy)
        .build()
        .map_err(|err| FetchError::new("", FailureKind::Network, err.to_string()))
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(url, FailureKind::InvalidUrl, err.to_string()))?;

        let mut request = self.client.get(parsed);
        if let Some(accept) = self.settings.accept.as_deref() {
            request = request.header(ACCEPT, accept);
        }

        glit_debug!("GET {}", url);
        let response = request
            .send()
            .await
            .map_err(|err| map_reqwest_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                url,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(url, content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(url, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(url, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = match decode_html(&bytes, content_type.as_deref()) {
            Ok(decoded) => decoded,
            Err(err) if self.decoding == DecodePolicy::Lossy => {
                glit_warn!("{}: {}; keeping page with replacement characters", url, err);
                decode_html_lossy(&bytes, content_type.as_deref())
            }
            Err(err) => return Err(FetchError::new(url, FailureKind::Decode, err.to_string())),
        };
        glit_debug!(
            "GET {} -> {} ({} bytes, {})",
            url,
            status.as_u16(),
            bytes.len(),
            decoded.encoding_label
        );

        Ok(PageContent {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            body: decoded.html,
            encoding: decoded.encoding_label,
        })
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(url, FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(url, FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(url, FailureKind::Network, err.to_string())
}
