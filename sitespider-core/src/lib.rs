pub mod crawl;
pub mod report;

pub use sitespider_crawler as crawler;
