use super::MediaError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client as HttpClient;
use tracing::error;

/// Source of raw media bytes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the resource at `url`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Download` on malformed URLs, connection failures and
    /// non-success statuses.
    async fn fetch(&self, url: &str) -> Result<Bytes, MediaError>;
}

/// Fetcher backed by a plain `reqwest` client.
///
/// No timeout or retry is configured; redirects follow the client defaults.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn download(&self, url: &str) -> Result<Bytes, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, MediaError> {
        self.download(url).await.map_err(|e| {
            error!("Failed to download media: {e}");
            MediaError::Download(e.to_string())
        })
    }
}
