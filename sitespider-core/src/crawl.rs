use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use sitespider_crawler::{
    CrawlConfig, CrawlStats, CrawlStatus, Crawler, HttpFetcher, ProgressCallback, SitemapTree,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub config: CrawlConfig,
    pub show_progress_bars: bool,
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Outcome of a completed crawl.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub homepage: String,
    pub depth_limit: usize,
    pub status: CrawlStatus,
    pub stats: CrawlStats,
    /// `None` when the homepage had no title to build a root from.
    pub tree: Option<SitemapTree>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Crawl one site and build its sitemap
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlSummary, String> {
    let CrawlOptions {
        config,
        show_progress_bars,
    } = options;

    let fetcher = HttpFetcher::new(&config)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Starting crawl of {}...", config.homepage));
        Some(Arc::new(pb))
    } else {
        None
    };

    let mapped_count = Arc::new(AtomicUsize::new(0));

    let internal_progress_callback: ProgressCallback = {
        let pb_clone = progress_bar.clone();
        let count_clone = mapped_count.clone();
        let outer = progress_callback.clone();
        Arc::new(move |depth: usize, url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "Mapping... {} pages (depth {}) {}",
                    count,
                    depth,
                    extract_url_path(&url)
                ));
                pb.tick();
            }
            if let Some(ref callback) = outer {
                callback(url);
            }
        })
    };

    let homepage = config.homepage.clone();
    let depth_limit = config.depth_limit;
    let mut crawler =
        Crawler::new(config, Arc::new(fetcher)).with_progress_callback(internal_progress_callback);

    let started_at = Utc::now();
    let start = Instant::now();
    let outcome = crawler.crawl().await;
    let elapsed = start.elapsed();

    match outcome {
        Ok(tree) => {
            let total = mapped_count.load(Ordering::Relaxed);
            if let Some(ref pb) = progress_bar {
                pb.finish_with_message(format!("Crawl complete! {} pages mapped", total));
            }
            info!("Crawl of {} finished in {:.1}s", homepage, elapsed.as_secs_f64());

            Ok(CrawlSummary {
                homepage,
                depth_limit,
                status: crawler.status(),
                stats: crawler.stats().clone(),
                tree,
                started_at,
                elapsed,
            })
        }
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.abandon_with_message("Crawl failed");
            }
            Err(format!("Failed to crawl {}: {}", homepage, e))
        }
    }
}

/// Generate a crawl report from a summary
pub fn generate_crawl_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Homepage: {}\n", summary.homepage));

    match summary.tree {
        Some(ref tree) => {
            report.push_str(&format!("  Site title: {}\n", tree.title()));
            report.push_str(&format!("  Pages in sitemap: {}\n", tree.text_references().count()));
            report.push_str(&format!("  Headlines: {}\n", summary.stats.headlines));
            report.push_str(&format!("  Deepest level: {}\n", tree.max_depth()));
        }
        None => report.push_str("  Sitemap: empty (homepage has no title)\n"),
    }

    let depth_limit = if summary.depth_limit == 0 {
        "unlimited".to_string()
    } else {
        summary.depth_limit.to_string()
    };
    report.push_str(&format!("  Depth limit: {}\n", depth_limit));
    report.push_str(&format!("  Duration: {:.1}s\n", summary.elapsed.as_secs_f64()));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let stats = &summary.stats;
    report.push_str("# Requests:\n");
    report.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    report.push_str(&format!("  Failed pages: {}\n", stats.fetch_failures));
    report.push_str(&format!("  Unparseable pages: {}\n", stats.extraction_failures));
    report.push_str(&format!("  Filtered references: {}\n", stats.references_filtered));
    report.push_str(&format!("  Refused by robots.txt: {}\n", stats.robots_refusals));
    report.push('\n');

    report
}
