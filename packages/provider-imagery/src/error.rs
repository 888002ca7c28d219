//! Typed errors for the provider imagery library.
//!
//! None of these reach the caller of [`ImageResolver::resolve`]; they exist so
//! the absorbed failure paths can be classified and logged with structure.
//!
//! [`ImageResolver::resolve`]: crate::ImageResolver::resolve

use thiserror::Error;

/// Why a website preview lookup produced no image.
///
/// Every variant collapses to `PreviewImage::NotFound` at the extractor
/// boundary. The classification only feeds logging.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Website URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Only http and https are fetched
    #[error("unsupported URL scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// Server answered with a non-2xx status
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// Host name did not resolve
    #[error("DNS resolution failed: {0}")]
    Dns(#[source] reqwest::Error),

    /// TLS handshake or certificate validation failed
    #[error("TLS failure: {0}")]
    Tls(#[source] reqwest::Error),

    /// Wall-clock bound exceeded, whether queued or in flight
    #[error("timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Fetch slots were shut down
    #[error("fetch slots closed")]
    SlotClosed,

    /// Redirect limit exceeded or redirect loop
    #[error("too many redirects: {0}")]
    Redirect(#[source] reqwest::Error),

    /// Connection refused, reset, or otherwise unestablished
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Failure while streaming the response body
    #[error("body read failed: {0}")]
    Body(#[source] reqwest::Error),

    /// Any other transport-level failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl FetchError {
    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::UnsupportedScheme { .. } => "unsupported_scheme",
            FetchError::Status { .. } => "status",
            FetchError::Dns(_) => "dns",
            FetchError::Tls(_) => "tls",
            FetchError::Timeout { .. } => "timeout",
            FetchError::SlotClosed => "slot_closed",
            FetchError::Redirect(_) => "redirect",
            FetchError::Connect(_) => "connect",
            FetchError::Body(_) => "body",
            FetchError::Transport(_) => "transport",
        }
    }

    /// Classify a request-phase `reqwest` error.
    ///
    /// `reqwest` reports DNS and TLS failures as connect errors, so the source
    /// chain is inspected to tell them apart.
    pub fn from_request(err: reqwest::Error, elapsed_ms: u64) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout { elapsed_ms };
        }
        if err.is_redirect() {
            return FetchError::Redirect(err);
        }
        if err.is_connect() {
            let chain = source_chain(&err);
            if chain.contains("dns") || chain.contains("resolve") || chain.contains("lookup") {
                return FetchError::Dns(err);
            }
            if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
                return FetchError::Tls(err);
            }
            return FetchError::Connect(err);
        }
        FetchError::Transport(err)
    }
}

/// Lower-cased concatenation of every message in an error's source chain.
fn source_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        chain.push_str(": ");
        chain.push_str(&source.to_string());
        current = source.source();
    }
    chain.to_lowercase()
}

/// Errors raised by [`ImageCache`](crate::traits::cache::ImageCache) backends.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Durable id is not valid for this backend (e.g. not a UUID)
    #[error("invalid provider id: {id}")]
    InvalidId { id: String },

    /// Backend storage failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors building a resolver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable present but unparseable
    #[error("{name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    /// Keyword or image table violates an invariant
    #[error("invalid imagery tables: {0}")]
    InvalidTables(String),

    /// Tables file could not be read
    #[error("failed to read tables file {path}: {source}")]
    TablesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Tables file is not valid JSON for `ImageryTables`
    #[error("failed to parse tables file: {0}")]
    TablesParse(#[from] serde_json::Error),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Result type alias for website fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Result type alias for configuration.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
