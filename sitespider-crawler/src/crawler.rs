use crate::config::{CrawlConfig, clamp_delay};
use crate::error::{CrawlError, FetchError, Result};
use crate::extract::PageContentExtractor;
use crate::fetch::Fetcher;
use crate::frontier::{Frontier, FrontierItem};
use crate::normalize::{AllowedDomain, has_page_extension};
use crate::page::{PageContent, ReferenceGroup};
use crate::robots::{RobotsPolicy, RobotsTxt};
use crate::tree::{SitemapTree, TreeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Invoked with `(depth, url)` each time a page joins the sitemap.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrawlStatus {
    Idle,
    Running,
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Successful requests, robots.txt and the homepage probe included.
    pub pages_fetched: usize,
    /// Page-local fetch failures; the affected references were dropped.
    pub fetch_failures: usize,
    pub extraction_failures: usize,
    pub references_filtered: usize,
    pub robots_refusals: usize,
    pub text_references: usize,
    pub headlines: usize,
}

/// Single-site sitemap crawler.
///
/// The crawl is a sequential loop over a LIFO frontier: pop a reference,
/// fetch and extract its page, graft a node for it, then push the page's
/// surviving references. A `Crawler` runs once; build a new one for the
/// next site.
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: PageContentExtractor,
    robots_policy: Option<Arc<dyn RobotsPolicy>>,
    rng: Box<dyn RngCore + Send>,
    progress_callback: Option<ProgressCallback>,
    status: CrawlStatus,
    stats: CrawlStats,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            extractor: PageContentExtractor::new(),
            robots_policy: None,
            rng: Box::new(StdRng::from_os_rng()),
            progress_callback: None,
            status: CrawlStatus::Idle,
            stats: CrawlStats::default(),
        }
    }

    /// Random source for the politeness jitter.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Uses `policy` instead of downloading the site's robots.txt. Only
    /// consulted when the configuration obeys robots rules.
    pub fn with_robots_policy(mut self, policy: Arc<dyn RobotsPolicy>) -> Self {
        self.robots_policy = Some(policy);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn status(&self) -> CrawlStatus {
        self.status
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the crawl to completion.
    ///
    /// Returns the finished sitemap, or `None` when the homepage could not
    /// be represented (it has no title). Page-local failures are logged and
    /// never surface here.
    pub async fn crawl(&mut self) -> Result<Option<SitemapTree>> {
        if self.status != CrawlStatus::Idle {
            return Err(CrawlError::AlreadyStarted);
        }

        self.status = CrawlStatus::Running;
        info!("Crawling started: {}", self.config.homepage);

        match self.run().await {
            Ok(tree) => {
                self.status = CrawlStatus::Success;
                info!(
                    "Crawling finished: {} text reference(s), {} headline(s)",
                    self.stats.text_references, self.stats.headlines
                );
                Ok(tree)
            }
            Err(e) => {
                self.status = CrawlStatus::Failed;
                error!("Crawling dumped: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&mut self) -> Result<Option<SitemapTree>> {
        let domain = AllowedDomain::from_homepage(&self.config.homepage)?;
        let limit = self.config.limit();

        // Any failure to reach the homepage ends the crawl before it starts.
        let mut homepage_body = Some(
            self.fetch(domain.as_str())
                .await
                .map_err(CrawlError::HomepageUnreachable)?,
        );

        let robots = self.load_robots(&domain).await;

        let mut frontier = Frontier::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut builder = TreeBuilder::new();
        frontier.push(FrontierItem::homepage(domain.as_str()));

        while let Some(mut item) = frontier.pop() {
            if let Some(limit) = limit
                && item.depth > limit
            {
                debug!("Ignoring link (depth > {}): {}", limit, item.url);
                continue;
            }
            if visited.contains(&item.url) {
                debug!("Ignoring already visited reference: {}", item.url);
                continue;
            }

            // A reference at the depth limit whose anchor text is known
            // never needs its page: nothing below it will be followed.
            // Without a limit every page is fetched so the crawl can go deeper.
            let needs_page = item.title.is_empty() || limit != Some(item.depth);

            let mut page: Option<PageContent> = None;
            if needs_page {
                if let Some(robots) = &robots
                    && !robots.allowed(&self.config.user_agent, &item.url)
                {
                    self.stats.robots_refusals += 1;
                    info!("Filtered reference (forbidden by robots.txt): {}", item.url);
                    continue;
                }

                let cached = if item.parent.is_none() {
                    homepage_body.take()
                } else {
                    None
                };
                let body = match cached {
                    Some(body) => body,
                    None => match self.fetch(&item.url).await {
                        Ok(body) => body,
                        Err(e) if e.is_connection() => return Err(CrawlError::ConnectionLost(e)),
                        Err(e) => {
                            self.stats.fetch_failures += 1;
                            warn!("{}", e);
                            continue;
                        }
                    },
                };
                info!("Crawled: {}", item.url);

                let content = match self.extractor.extract(&body) {
                    Ok(content) => content,
                    Err(e) => {
                        self.stats.extraction_failures += 1;
                        warn!("{} ({})", e, item.url);
                        continue;
                    }
                };
                debug!("Parsed: {}", item.url);

                if item.title.is_empty() {
                    item.title = content.title().to_string();
                }
                page = Some(content);
            }

            if item.title.is_empty() {
                warn!("Reference has no title: {}", item.url);
                continue;
            }

            let node = match item.parent {
                None => builder.set_root(item.url.as_str(), item.title.as_str()),
                Some(parent) => builder.add_text_reference(parent, item.url.as_str(), item.title.as_str()),
            };
            visited.insert(item.url.clone());
            self.stats.text_references += 1;
            debug!(
                "Added sitemap text reference element: {} '{}' (depth {})",
                item.url, item.title, item.depth
            );
            if let Some(ref callback) = self.progress_callback {
                callback(item.depth, item.url.clone());
            }

            let Some(page) = page else {
                continue;
            };
            if limit.is_some_and(|limit| item.depth >= limit) {
                continue;
            }

            for group in page.groups() {
                let survivors = self.filter_group(group, &domain, &visited, &frontier);
                if survivors.is_empty() {
                    continue;
                }

                let parent = if group.headline().is_empty() {
                    node
                } else {
                    self.stats.headlines += 1;
                    debug!("Added sitemap headline element: '{}'", group.headline());
                    builder.add_headline(node, group.headline())
                };

                // Reversed so the LIFO pops them in page order.
                for (url, title) in survivors.into_iter().rev() {
                    frontier.push(FrontierItem {
                        url,
                        depth: item.depth + 1,
                        title,
                        parent: Some(parent),
                    });
                }
            }
        }

        Ok(builder.finish())
    }

    /// Normalizes a group's references and keeps the ones worth following,
    /// as `(url, title)` pairs in page order.
    fn filter_group(
        &mut self,
        group: &ReferenceGroup,
        domain: &AllowedDomain,
        visited: &HashSet<String>,
        frontier: &Frontier,
    ) -> Vec<(String, String)> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut survivors = Vec::new();

        for reference in group.references() {
            let Some(url) = domain.normalize_reference(reference.url()) else {
                self.stats.references_filtered += 1;
                debug!("Filtered malformed reference: {}", reference.url());
                continue;
            };
            if !domain.contains(&url) {
                self.stats.references_filtered += 1;
                debug!("Filtered offsite reference: {}", url);
                continue;
            }
            if !has_page_extension(&url) {
                self.stats.references_filtered += 1;
                debug!("Filtered reference (unsuitable file format): {}", url);
                continue;
            }
            if visited.contains(&url) || frontier.contains(&url) || !seen.insert(url.clone()) {
                self.stats.references_filtered += 1;
                debug!("Filtered duplicate reference: {}", url);
                continue;
            }
            survivors.push((url, reference.title().to_string()));
        }

        survivors
    }

    async fn load_robots(&mut self, domain: &AllowedDomain) -> Option<Arc<dyn RobotsPolicy>> {
        if !self.config.obey_robots {
            return None;
        }
        if let Some(policy) = &self.robots_policy {
            return Some(policy.clone());
        }

        let url = domain.robots_txt_url();
        match self.fetch(&url).await {
            Ok(body) => {
                debug!("Parsed: {}", url);
                Some(Arc::new(RobotsTxt::parse(&body)))
            }
            Err(e) => {
                warn!("robots.txt unavailable, ignoring robots rules for this crawl: {}", e);
                None
            }
        }
    }

    /// One fetch with connection retries, followed by the politeness pause.
    async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError> {
        let attempts = self.config.connection_attempts.max(1);
        let mut attempt = 1;

        let result = loop {
            match self.fetcher.fetch(url).await {
                Err(e) if e.is_connection() && attempt < attempts => {
                    warn!(
                        "Connection to {} failed, trying to connect again ({}/{})",
                        url, attempt, attempts
                    );
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_pause()).await;
                }
                other => break other,
            }
        };

        if result.is_ok() {
            self.stats.pages_fetched += 1;
        }
        self.politeness_pause().await;

        result
    }

    async fn politeness_pause(&mut self) {
        let average = clamp_delay(self.config.download_delay);
        if average <= 0.0 {
            return;
        }

        let seconds = self.rng.random_range(0.5 * average..=1.5 * average);
        debug!("Politeness pause of {:.3}s", seconds);
        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
    }
}
