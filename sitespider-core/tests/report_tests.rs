// Tests for sitemap report generation

use sitespider_core::crawl::CrawlSummary;
use sitespider_core::crawler::tree::TreeBuilder;
use sitespider_core::crawler::{CrawlStats, CrawlStatus, SitemapTree};
use sitespider_core::report::{
    ReportData, ReportFormat, generate_html_report, generate_json_report,
    generate_markdown_report, generate_report, generate_text_report, save_report,
};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

fn sample_tree() -> SitemapTree {
    let mut builder = TreeBuilder::new();
    let root = builder.set_root("http://example.com/", "Example & Co");
    let news = builder.add_headline(root, "News");
    builder.add_text_reference(news, "http://example.com/n1/", "First <post>");
    builder.add_text_reference(news, "http://example.com/n2/", "Second");
    let about = builder.add_text_reference(root, "http://example.com/about/", "About");
    builder.add_text_reference(about, "http://example.com/team/?a=1&b=2", "Team");
    builder.finish().unwrap()
}

fn sample_data() -> ReportData {
    ReportData {
        homepage: "http://example.com/".to_string(),
        depth_limit: 2,
        duration_secs: 4.25,
        stats: CrawlStats {
            pages_fetched: 5,
            headlines: 1,
            text_references: 5,
            ..CrawlStats::default()
        },
        sitemap: sample_tree(),
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("html"), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("HTML"), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("csv").is_none());
    assert!(ReportFormat::from_str("pdf").is_none());
}

#[test]
fn test_report_format_from_path() {
    assert_eq!(ReportFormat::from_path(Path::new("out/site.html")), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_path(Path::new("site.htm")), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_path(Path::new("site.md")), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_path(Path::new("site.txt")), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_path(Path::new("site")), None);
    assert_eq!(ReportFormat::from_path(Path::new("site.pdf")), None);
}

#[test]
fn test_report_format_extension_round_trips() {
    for format in [
        ReportFormat::Text,
        ReportFormat::Json,
        ReportFormat::Html,
        ReportFormat::Markdown,
    ] {
        let file = format!("report.{}", format.extension());
        assert_eq!(ReportFormat::from_path(Path::new(&file)), Some(format));
    }
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_report_data_from_summary() {
    let summary = CrawlSummary {
        homepage: "http://example.com/".to_string(),
        depth_limit: 0,
        status: CrawlStatus::Success,
        stats: CrawlStats::default(),
        tree: Some(sample_tree()),
        started_at: chrono::Utc::now(),
        elapsed: Duration::from_secs(2),
    };

    let data = ReportData::from_summary(&summary).unwrap();
    assert_eq!(data.homepage, "http://example.com/");
    assert_eq!(data.duration_secs, 2.0);
    assert_eq!(data.sitemap.node_count(), 6);
}

#[test]
fn test_report_data_from_summary_without_tree() {
    let summary = CrawlSummary {
        homepage: "http://example.com/".to_string(),
        depth_limit: 0,
        status: CrawlStatus::Success,
        stats: CrawlStats::default(),
        tree: None,
        started_at: chrono::Utc::now(),
        elapsed: Duration::from_secs(2),
    };

    assert!(ReportData::from_summary(&summary).is_none());
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_header() {
    let report = generate_text_report(&sample_data());

    assert!(report.contains("SITESPIDER SITEMAP REPORT"));
    assert!(report.contains("Site:         Example & Co"));
    assert!(report.contains("Depth Limit:  2"));
    assert!(report.contains("Pages:        5"));
    assert!(report.contains("End of Report"));
}

#[test]
fn test_text_report_draws_tree() {
    let report = generate_text_report(&sample_data());

    let expected = "\
Example & Co  [http://example.com/]
├── # News
│   ├── First <post>  [http://example.com/n1/]
│   └── Second  [http://example.com/n2/]
└── About  [http://example.com/about/]
    └── Team  [http://example.com/team/?a=1&b=2]
";
    assert!(report.contains(expected), "tree not found in:\n{}", report);
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&sample_data()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "SiteSpider");
    assert!(report["metadata"]["generated_at"].is_string());
    assert_eq!(report["crawl"]["depth_limit"], 2);
    assert_eq!(report["crawl"]["stats"]["pages_fetched"], 5);
    assert_eq!(report["sitemap"]["title"], "Example & Co");
    assert_eq!(report["sitemap"]["total_nodes"], 6);
    assert_eq!(report["sitemap"]["max_depth"], 2);
}

#[test]
fn test_json_report_nests_nodes() {
    let json = generate_json_report(&sample_data()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let root = &value["report"]["sitemap"]["root"];
    assert_eq!(root["kind"], "text_reference");
    assert_eq!(root["url"], "http://example.com/");
    assert_eq!(root["children"][0]["kind"], "headline");
    assert_eq!(root["children"][0]["text"], "News");
    assert_eq!(root["children"][0]["children"][1]["title"], "Second");
    assert_eq!(root["children"][1]["children"][0]["depth"], 2);
}

// ============================================================================
// Markdown Report Tests
// ============================================================================

#[test]
fn test_markdown_report_nested_list() {
    let report = generate_markdown_report(&sample_data());

    assert!(report.starts_with("# Example & Co: Sitemap\n"));
    assert!(report.contains("- [Example & Co](http://example.com/)\n"));
    assert!(report.contains("  - **News**\n"));
    assert!(report.contains("    - [First <post>](http://example.com/n1/)\n"));
    assert!(report.contains("  - [About](http://example.com/about/)\n"));
    assert!(report.contains("    - [Team](http://example.com/team/?a=1&b=2)\n"));
}

// ============================================================================
// HTML Report Tests
// ============================================================================

#[test]
fn test_html_report_title_is_escaped() {
    let html = generate_html_report(&sample_tree());

    assert!(html.contains("<title>Example &amp; Co: Sitemap</title>"));
    assert!(html.contains("<div class=\"SitemapTitle\"><h1>Example &amp; Co<br>Sitemap</h1></div>"));
    assert!(html.contains("First &lt;post&gt;"));
}

#[test]
fn test_html_report_node_classes() {
    let html = generate_html_report(&sample_tree());

    assert!(html.contains("<li class=\"SitemapNode Root ExpandClosed\">"));
    // News has children and is not the last child of the root
    assert!(html.contains(
        "<li class=\"SitemapNode ExpandClosed\"><div class=\"Expand\"></div><div class=\"NodeContent Headline_level_1\">News</div>"
    ));
    // Second is the last child of News and a leaf
    assert!(html.contains(
        "<li class=\"SitemapNode ExpandLeaf LastChild\"><div class=\"Expand\"></div><div class=\"NodeContent TextReference_level_1\"><a href=\"http://example.com/n2/\">Second</a></div>"
    ));
    // About is the last child of the root and has a child
    assert!(html.contains("<li class=\"SitemapNode ExpandClosed LastChild\">"));
    assert!(html.contains("TextReference_level_2"));
    assert!(html.contains("onclick=\"tree_toggle(arguments[0])\""));
}

#[test]
fn test_html_report_is_well_nested() {
    let html = generate_html_report(&sample_tree());

    let opened = html.matches("<ul class=\"NodeContainer\">").count();
    let closed = html.matches("</li></ul>").count();
    assert_eq!(opened, 6);
    assert_eq!(opened, closed);
    assert!(html.contains("function tree_toggle(event)"));
}

#[test]
fn test_html_report_escapes_query_ampersands_in_href() {
    let html = generate_html_report(&sample_tree());
    assert!(html.contains("href=\"http://example.com/team/?a=1&amp;b=2\""));
}

// ============================================================================
// Dispatch and Save Tests
// ============================================================================

#[test]
fn test_generate_report_dispatches_by_format() {
    let data = sample_data();

    assert!(generate_report(&data, ReportFormat::Text).unwrap().contains("SITE MAP"));
    assert!(generate_report(&data, ReportFormat::Json).unwrap().contains("\"generator\""));
    assert!(generate_report(&data, ReportFormat::Html).unwrap().starts_with("<!DOCTYPE html>"));
    assert!(generate_report(&data, ReportFormat::Markdown).unwrap().contains("## Site map"));
}

#[test]
fn test_save_report() {
    let temp_file = NamedTempFile::new().unwrap();
    let content = generate_html_report(&sample_tree());

    save_report(&content, temp_file.path()).unwrap();

    let saved = std::fs::read_to_string(temp_file.path()).unwrap();
    assert_eq!(saved, content);
}

#[test]
fn test_save_report_to_missing_directory_fails() {
    let result = save_report("x", Path::new("/nonexistent/dir/report.html"));
    assert!(result.is_err());
}
