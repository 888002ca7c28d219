//! HTTP-backed preview image extractor.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

use crate::config::ResolverConfig;
use crate::error::{ConfigError, ConfigResult, FetchError, FetchResult};
use crate::traits::preview::PreviewImageSource;
use crate::types::resolution::PreviewImage;
use crate::website::html::scan_preview_image;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// Fetches a provider's website once and scans it for a preview image.
///
/// Every call is bounded by the configured timeout (5 s by default) and
/// concurrent fetches are capped by a semaphore. Time spent queued for a
/// permit counts against the same deadline, so a call still waiting when it
/// expires gives up with no request sent. Dropping the returned future
/// abandons the fetch and frees the permit.
///
/// # Example
///
/// ```rust,ignore
/// use provider_imagery::{HttpPreviewExtractor, PreviewImageSource, ResolverConfig};
///
/// let extractor = HttpPreviewExtractor::from_config(&ResolverConfig::default())?;
/// let preview = extractor.extract("https://rainbowart.example").await;
/// ```
pub struct HttpPreviewExtractor {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
    permits: Arc<Semaphore>,
}

impl HttpPreviewExtractor {
    /// Extractor with default settings.
    pub fn new() -> ConfigResult<Self> {
        Self::from_config(&ResolverConfig::default())
    }

    pub fn from_config(config: &ResolverConfig) -> ConfigResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
            max_body_bytes: config.max_body_bytes,
            permits: Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1))),
        })
    }

    /// Set a custom HTTP client. The wall-clock bound still applies.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for a fetch slot, then fetch. Held permits are released on return.
    async fn fetch_in_slot(&self, url: &str, started: Instant) -> FetchResult<(String, Url)> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::SlotClosed)?;
        self.fetch_document(url, started).await
    }

    /// Fetch the page, returning up to `max_body_bytes` of HTML and the final
    /// URL after redirects.
    async fn fetch_document(&self, url: &str, started: Instant) -> FetchResult<(String, Url)> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }

        debug!(url = %parsed, "Website preview fetch starting");
        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_request(e, elapsed_ms(started)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    elapsed_ms: elapsed_ms(started),
                }
            } else {
                FetchError::Body(e)
            }
        })? {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!(url = %final_url, limit = self.max_body_bytes, "Body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok((String::from_utf8_lossy(&body).into_owned(), final_url))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[async_trait]
impl PreviewImageSource for HttpPreviewExtractor {
    async fn extract(&self, url: &str) -> PreviewImage {
        let started = Instant::now();
        let fetched = tokio::time::timeout(self.timeout, self.fetch_in_slot(url, started))
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    elapsed_ms: elapsed_ms(started),
                })
            });

        match fetched {
            Ok((html, final_url)) => {
                let preview = scan_preview_image(&html, Some(&final_url));
                debug!(
                    url = %url,
                    source = %preview.source(),
                    image_url = preview.url().unwrap_or_default(),
                    elapsed_ms = elapsed_ms(started),
                    "Website preview scanned"
                );
                preview
            }
            Err(e) => {
                debug!(
                    url = %url,
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = elapsed_ms(started),
                    "Website preview lookup failed"
                );
                PreviewImage::NotFound
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_not_found() {
        let extractor = HttpPreviewExtractor::new().unwrap();
        assert_eq!(extractor.extract("not a url").await, PreviewImage::NotFound);
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_not_found() {
        let extractor = HttpPreviewExtractor::new().unwrap();
        assert_eq!(
            extractor.extract("ftp://files.example/index.html").await,
            PreviewImage::NotFound
        );

        let err = extractor
            .fetch_document("file:///etc/passwd", Instant::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unsupported_scheme");
    }

    #[test]
    fn test_from_config_uses_timeout() {
        let config = ResolverConfig::default().with_fetch_timeout(Duration::from_millis(250));
        let extractor = HttpPreviewExtractor::from_config(&config).unwrap();
        assert_eq!(extractor.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_queued_call_gives_up_at_deadline() {
        let config = ResolverConfig::default()
            .with_max_concurrent_fetches(1)
            .with_fetch_timeout(Duration::from_millis(200));
        let extractor = HttpPreviewExtractor::from_config(&config).unwrap();
        let _held = extractor.permits.acquire().await.unwrap();

        let started = Instant::now();
        let preview = extractor.extract("http://127.0.0.1:9/").await;

        assert_eq!(preview, PreviewImage::NotFound);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_closed_slots_are_not_found() {
        let extractor = HttpPreviewExtractor::new().unwrap();
        extractor.permits.close();

        let err = extractor
            .fetch_in_slot("https://studio.example", Instant::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "slot_closed");
        assert_eq!(
            extractor.extract("https://studio.example").await,
            PreviewImage::NotFound
        );
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let config = ResolverConfig::default().with_max_concurrent_fetches(0);
        let extractor = HttpPreviewExtractor::from_config(&config).unwrap();
        assert_eq!(extractor.permits.available_permits(), 1);
    }
}
