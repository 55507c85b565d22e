use sitespider::handlers::*;
use sitespider_core::report::ReportFormat;
use std::path::Path;
use tempfile::NamedTempFile;

fn crawl_args(url: &str) -> CrawlArgs {
    CrawlArgs {
        url: url.to_string(),
        depth: 2,
        delay: 1.5,
        attempts: 4,
        retry_delay: 0.5,
        ignore_robots: false,
        user_agent: "SiteSpider/1.0".to_string(),
        timeout: 10,
        output: None,
        format: None,
        log_file: None,
    }
}

// ============================================================================
// URL Parsing Tests
// ============================================================================

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    assert_eq!(parse_url_line("example.com"), Some("http://example.com".to_string()));
    assert_eq!(
        parse_url_line("localhost:8080"),
        Some("http://localhost:8080".to_string())
    );
}

#[test]
fn test_parse_url_line_trims_whitespace() {
    assert_eq!(parse_url_line("  example.com/docs \n"), Some("http://example.com/docs".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    assert_eq!(parse_url_line("not a valid url!!!"), None);
    assert_eq!(parse_url_line("   "), None);
}

// ============================================================================
// Crawl Argument Tests
// ============================================================================

#[test]
fn test_crawl_args_to_config() {
    let config = crawl_args("example.com").to_config().unwrap();

    assert_eq!(config.homepage, "http://example.com");
    assert_eq!(config.depth_limit, 2);
    assert_eq!(config.download_delay, 1.5);
    assert_eq!(config.connection_attempts, 4);
    assert_eq!(config.retry_delay, 0.5);
    assert!(config.obey_robots);
    assert_eq!(config.timeout_secs, 10);
}

#[test]
fn test_crawl_args_ignore_robots() {
    let mut args = crawl_args("https://example.com/");
    args.ignore_robots = true;
    args.user_agent = "MyBot/2.0".to_string();

    let config = args.to_config().unwrap();
    assert!(!config.obey_robots);
    assert_eq!(config.user_agent, "MyBot/2.0");
}

#[test]
fn test_crawl_args_invalid_url() {
    let result = crawl_args("not a valid url!!!").to_config();
    assert!(result.unwrap_err().contains("Invalid homepage URL"));
}

#[test]
fn test_parse_delay_accepts_range() {
    assert_eq!(parse_delay("0"), Ok(0.0));
    assert_eq!(parse_delay("2.5"), Ok(2.5));
    assert_eq!(parse_delay("86400"), Ok(86_400.0));
}

#[test]
fn test_parse_delay_rejects_out_of_range() {
    for value in ["1e300", "inf", "NaN", "-1", "86400.5"] {
        let err = parse_delay(value).unwrap_err();
        assert!(err.contains("between 0 and"), "{}: {}", value, err);
    }
    assert!(parse_delay("soon").unwrap_err().contains("not a number"));
}

// ============================================================================
// Report Format Selection Tests
// ============================================================================

#[test]
fn test_select_report_format_explicit_wins() {
    let format = select_report_format(Some("json"), Some(Path::new("site.html"))).unwrap();
    assert_eq!(format, ReportFormat::Json);
}

#[test]
fn test_select_report_format_from_extension() {
    assert_eq!(
        select_report_format(None, Some(Path::new("site.md"))).unwrap(),
        ReportFormat::Markdown
    );
    assert_eq!(
        select_report_format(None, Some(Path::new("site.json"))).unwrap(),
        ReportFormat::Json
    );
}

#[test]
fn test_select_report_format_defaults() {
    assert_eq!(select_report_format(None, None).unwrap(), ReportFormat::Text);
    assert_eq!(
        select_report_format(None, Some(Path::new("sitemap"))).unwrap(),
        ReportFormat::Html
    );
}

#[test]
fn test_select_report_format_unknown() {
    let result = select_report_format(Some("pdf"), None);
    assert!(result.unwrap_err().contains("Unknown report format"));
}

// ============================================================================
// Output Path Tests
// ============================================================================

#[test]
fn test_resolve_output_path_plain() {
    assert_eq!(resolve_output_path("out/site.html"), Path::new("out/site.html"));
}

#[test]
fn test_resolve_output_path_expands_tilde() {
    let resolved = resolve_output_path("~/site.html");
    assert!(!resolved.to_string_lossy().starts_with('~'));
    assert!(resolved.ends_with("site.html"));
}

// ============================================================================
// Logging Tests
// ============================================================================

#[test]
fn test_init_logging_to_file() {
    let log_file = NamedTempFile::new().unwrap();

    init_logging(Some(log_file.path())).unwrap();
    tracing::warn!("written to the log file");

    let content = std::fs::read_to_string(log_file.path()).unwrap();
    assert!(content.contains("written to the log file"));
    // A second subscriber cannot be installed
    assert!(init_logging(None).is_err());
}
