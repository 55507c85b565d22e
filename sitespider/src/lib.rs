// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{
    CrawlArgs, init_logging, parse_delay, parse_url_line, resolve_output_path, select_report_format,
};

// Re-export crawl functionality from sitespider-core
pub use sitespider_core::crawl::{
    CrawlOptions, CrawlProgressCallback, CrawlSummary, execute_crawl, extract_url_path,
    generate_crawl_report,
};
