pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod normalize;
pub mod page;
pub mod robots;
pub mod tree;

pub use config::{CrawlConfig, MAX_DELAY_SECS};
pub use crawler::{CrawlStats, CrawlStatus, Crawler, ProgressCallback};
pub use error::{CrawlError, ExtractionError, FetchError};
pub use extract::PageContentExtractor;
pub use fetch::{Fetcher, HttpFetcher};
pub use page::{PageContent, Reference, ReferenceGroup};
pub use robots::{AllowAll, RobotsPolicy, RobotsTxt};
pub use tree::{SitemapNode, SitemapTree};
