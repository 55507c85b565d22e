use thiserror::Error;

/// Failure reported by a [`Fetcher`](crate::fetch::Fetcher) for a single request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure: DNS, refused connection, timeout, reset.
    /// The only class that is retried and that can end a crawl.
    #[error("Unable to connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other failure (HTTP error status, protocol violation, broken body).
    #[error("Unable to retrieve resource from {url}: {reason}")]
    Retrieve { url: String, reason: String },
}

impl FetchError {
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Error while parsing site page: document is empty")]
    EmptyDocument,
}

/// Fatal outcomes. Any of these moves the crawler to `Failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    #[error("Invalid homepage URL '{url}': {reason}")]
    InvalidHomepage { url: String, reason: String },

    #[error("Homepage probe failed: {0}")]
    HomepageUnreachable(FetchError),

    #[error("Connection lost: {0}")]
    ConnectionLost(FetchError),

    #[error("Crawl was already started")]
    AlreadyStarted,
}

pub type Result<T> = std::result::Result<T, CrawlError>;
