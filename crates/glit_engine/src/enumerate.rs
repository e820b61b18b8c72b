use glit_core::RepositoryDescriptor;
use glit_logging::glit_debug;
use serde::Deserialize;

use crate::{FetchError, PageFetcher};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumerationError {
    #[error("failed to list repositories at {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("unexpected repository listing at {url}: {message}")]
    Parse { url: String, message: String },
}

impl EnumerationError {
    pub fn url(&self) -> &str {
        match self {
            EnumerationError::Fetch { url, .. } | EnumerationError::Parse { url, .. } => url,
        }
    }
}

#[async_trait::async_trait]
pub trait RepositoryEnumerator: Send + Sync {
    async fn list_repositories(
        &self,
        profile_url: &str,
    ) -> Result<Vec<RepositoryDescriptor>, EnumerationError>;
}

/// Record shape of the hosting API's repository listing. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    html_url: String,
}

/// Lists repositories through `{profile_url}/repos`, keeping the API's order.
#[derive(Debug, Clone)]
pub struct ApiRepositoryEnumerator<F> {
    fetcher: F,
}

impl<F: PageFetcher> ApiRepositoryEnumerator<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

/// `https://host/users/alice` and `https://host/users/alice/` both map to
/// `https://host/users/alice/repos`.
pub fn listing_url(profile_url: &str) -> String {
    let trimmed = profile_url.trim();
    let base = trimmed.strip_suffix('/').unwrap_or(trimmed);
    format!("{base}/repos")
}

/// Parses a listing body; anything but a well-formed list is rejected whole.
pub fn parse_listing(url: &str, body: &str) -> Result<Vec<RepositoryDescriptor>, EnumerationError> {
    let records: Vec<ApiRepository> =
        serde_json::from_str(body).map_err(|err| EnumerationError::Parse {
            url: url.to_string(),
            message: err.to_string(),
        })?;
    Ok(records
        .into_iter()
        .map(|record| RepositoryDescriptor::new(record.name, record.html_url))
        .collect())
}

#[async_trait::async_trait]
impl<F: PageFetcher> RepositoryEnumerator for ApiRepositoryEnumerator<F> {
    async fn list_repositories(
        &self,
        profile_url: &str,
    ) -> Result<Vec<RepositoryDescriptor>, EnumerationError> {
        let url = listing_url(profile_url);
        let page = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| EnumerationError::Fetch {
                url: url.clone(),
                source,
            })?;
        let repositories = parse_listing(&url, &page.body)?;
        glit_debug!("{} lists {} repositories", url, repositories.len());
        Ok(repositories)
    }
}
