use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "SiteSpider/1.0";

/// Upper bound for the download and retry delays, in seconds.
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// Clamps a delay into `0..=MAX_DELAY_SECS`; NaN becomes 0.
pub fn clamp_delay(seconds: f64) -> f64 {
    if seconds.is_nan() {
        return 0.0;
    }
    seconds.clamp(0.0, MAX_DELAY_SECS)
}

/// Settings for one crawl run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub homepage: String,
    /// Maximum click depth; 0 means unlimited.
    pub depth_limit: usize,
    /// Average pause after each request, in seconds. The actual pause is
    /// drawn uniformly from half to one and a half times this value.
    pub download_delay: f64,
    /// Attempts per URL before a connection failure becomes fatal.
    pub connection_attempts: u32,
    /// Pause between two connection attempts, in seconds.
    pub retry_delay: f64,
    pub obey_robots: bool,
    pub user_agent: String,
    /// Per-request transport timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            homepage: String::new(),
            depth_limit: 0,
            download_delay: 0.0,
            connection_attempts: 3,
            retry_delay: 5.0,
            obey_robots: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl CrawlConfig {
    pub fn new(homepage: impl Into<String>) -> Self {
        Self {
            homepage: homepage.into(),
            ..Self::default()
        }
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_download_delay(mut self, seconds: f64) -> Self {
        self.download_delay = clamp_delay(seconds);
        self
    }

    pub fn with_connection_attempts(mut self, attempts: u32) -> Self {
        self.connection_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, seconds: f64) -> Self {
        self.retry_delay = clamp_delay(seconds);
        self
    }

    pub fn with_obey_robots(mut self, obey: bool) -> Self {
        self.obey_robots = obey;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The configured depth limit, or `None` when the crawl is unbounded.
    pub fn limit(&self) -> Option<usize> {
        (self.depth_limit > 0).then_some(self.depth_limit)
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_secs_f64(clamp_delay(self.retry_delay))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
