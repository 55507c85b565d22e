// Sitemap report generation

use crate::crawl::CrawlSummary;
use serde::{Deserialize, Serialize};
use sitespider_crawler::{CrawlStats, SitemapNode, SitemapTree};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "html" | "htm" => Some(ReportFormat::Html),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub homepage: String,
    pub depth_limit: usize,
    pub duration_secs: f64,
    pub stats: CrawlStats,
    pub sitemap: SitemapTree,
}

impl ReportData {
    /// `None` when the crawl produced no sitemap.
    pub fn from_summary(summary: &CrawlSummary) -> Option<Self> {
        let sitemap = summary.tree.clone()?;
        Some(Self {
            homepage: summary.homepage.clone(),
            depth_limit: summary.depth_limit,
            duration_secs: summary.elapsed.as_secs_f64(),
            stats: summary.stats.clone(),
            sitemap,
        })
    }
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data).map_err(|e| e.to_string()),
        ReportFormat::Html => Ok(generate_html_report(&data.sitemap)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push_str("                          SITESPIDER SITEMAP REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Site:         {}\n", data.sitemap.title()));
    report.push_str(&format!("Homepage:     {}\n", data.homepage));
    report.push_str(&format!("Depth Limit:  {}\n", format_depth_limit(data.depth_limit)));
    report.push_str(&format!("Pages:        {}\n", data.sitemap.text_references().count()));
    report.push_str(&format!("Headlines:    {}\n", data.stats.headlines));
    report.push_str(&format!("Duration:     {:.1} seconds\n", data.duration_secs));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("SITE MAP\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&generate_sitemap_tree(&data.sitemap));
    report.push('\n');

    // Footer
    report.push_str(RULE);
    report.push_str("                                End of Report\n");
    report.push_str(RULE);
    report.push_str("\nGenerated by SiteSpider\n\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "SiteSpider",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "homepage": data.homepage,
                "depth_limit": data.depth_limit,
                "duration_seconds": data.duration_secs,
                "stats": data.stats
            },
            "sitemap": {
                "title": data.sitemap.title(),
                "total_nodes": data.sitemap.node_count(),
                "total_pages": data.sitemap.text_references().count(),
                "max_depth": data.sitemap.max_depth(),
                "root": data.sitemap.root()
            }
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(&format!("# {}: Sitemap\n\n", escape_markdown(data.sitemap.title())));
    report.push_str(&format!("- **Homepage:** <{}>\n", data.homepage));
    report.push_str(&format!("- **Depth limit:** {}\n", format_depth_limit(data.depth_limit)));
    report.push_str(&format!("- **Pages:** {}\n", data.sitemap.text_references().count()));
    report.push_str("\n## Site map\n\n");

    write_markdown_node(data.sitemap.root(), 0, &mut report);

    report.push_str("\n---\n*Generated by SiteSpider*\n");
    report
}

/// Render the sitemap as a standalone, collapsible HTML page.
pub fn generate_html_report(tree: &SitemapTree) -> String {
    let title = html_escape::encode_text(tree.title());

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}: Sitemap</title>\n", title));
    page.push_str(&format!("<style>\n{}</style>\n", SITEMAP_CSS));
    page.push_str(&format!("<script>\n{}</script>\n", SITEMAP_JS));
    page.push_str("</head>\n<body>\n");

    page.push_str(&format!(
        "<div class=\"SitemapTitle\"><h1>{}<br>Sitemap</h1></div>\n",
        title
    ));
    page.push_str("<div class=\"SitemapTree\" onclick=\"tree_toggle(arguments[0])\">\n");
    write_html_node(tree.root(), true, false, &mut page);
    page.push_str("</div>\n</body>\n</html>\n");

    page
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_depth_limit(depth_limit: usize) -> String {
    if depth_limit == 0 {
        "unlimited".to_string()
    } else {
        depth_limit.to_string()
    }
}

fn generate_sitemap_tree(tree: &SitemapTree) -> String {
    let mut result = String::new();
    result.push_str(&format_tree_label(tree.root()));
    result.push('\n');

    let children = tree.root().children();
    for (i, child) in children.iter().enumerate() {
        write_tree_branch(child, "", i == children.len() - 1, &mut result);
    }

    result
}

fn write_tree_branch(node: &SitemapNode, prefix: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(&format!("{}{}{}\n", prefix, connector, format_tree_label(node)));

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        write_tree_branch(child, &child_prefix, i == children.len() - 1, out);
    }
}

fn format_tree_label(node: &SitemapNode) -> String {
    match node {
        SitemapNode::TextReference { url, title, .. } => format!("{}  [{}]", title, url),
        SitemapNode::Headline { text, .. } => format!("# {}", text),
    }
}

fn write_markdown_node(node: &SitemapNode, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    match node {
        SitemapNode::TextReference { url, title, .. } => {
            out.push_str(&format!("{}- [{}]({})\n", indent, escape_markdown(title), url));
        }
        SitemapNode::Headline { text, .. } => {
            out.push_str(&format!("{}- **{}**\n", indent, escape_markdown(text)));
        }
    }
    for child in node.children() {
        write_markdown_node(child, level + 1, out);
    }
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '[' | ']' | '*' | '_' | '`' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// Every node sits in its own NodeContainer list, so the stylesheet can draw
// the connecting lines per node.
fn write_html_node(node: &SitemapNode, is_root: bool, is_last: bool, out: &mut String) {
    let mut class = if is_root {
        "SitemapNode Root ExpandClosed".to_string()
    } else if node.is_leaf() {
        "SitemapNode ExpandLeaf".to_string()
    } else {
        "SitemapNode ExpandClosed".to_string()
    };
    if !is_root && is_last {
        class.push_str(" LastChild");
    }

    out.push_str("<ul class=\"NodeContainer\">");
    out.push_str(&format!("<li class=\"{}\">", class));
    out.push_str("<div class=\"Expand\"></div>");

    match node {
        SitemapNode::TextReference {
            url, title, depth, ..
        } => {
            out.push_str(&format!(
                "<div class=\"NodeContent TextReference_level_{}\"><a href=\"{}\">{}</a></div>",
                depth,
                html_escape::encode_double_quoted_attribute(url),
                html_escape::encode_text(title)
            ));
        }
        SitemapNode::Headline { text, depth, .. } => {
            out.push_str(&format!(
                "<div class=\"NodeContent Headline_level_{}\">{}</div>",
                depth,
                html_escape::encode_text(text)
            ));
        }
    }
    out.push('\n');

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        write_html_node(child, false, i == children.len() - 1, out);
    }

    out.push_str("</li></ul>\n");
}

const SITEMAP_CSS: &str = r#"body { font-family: Verdana, Arial, sans-serif; font-size: 14px; margin: 2em; }
.SitemapTitle h1 { font-size: 1.6em; font-weight: normal; }
.SitemapTree { padding-left: 0; }
.NodeContainer { list-style: none; margin: 0; padding: 0; }
.SitemapNode { margin-left: 18px; zoom: 1; }
.SitemapNode.Root { margin-left: 0; }
.Expand { width: 18px; height: 18px; float: left; }
.ExpandOpen > .Expand { cursor: pointer; }
.ExpandOpen > .Expand::before { content: "\2212"; }
.ExpandClosed > .Expand { cursor: pointer; }
.ExpandClosed > .Expand::before { content: "+"; }
.ExpandLeaf > .Expand::before { content: "\00B7"; }
.NodeContent { min-height: 18px; margin-left: 18px; }
.ExpandClosed > .NodeContainer { display: none; }
.ExpandOpen > .NodeContainer { display: block; }
.LastChild { margin-bottom: 0.3em; }
.NodeContent a { color: #1a0dab; text-decoration: none; }
.NodeContent a:hover { text-decoration: underline; }
[class*="Headline_level_"] { font-weight: bold; color: #555; }
.TextReference_level_0 { font-size: 1.3em; }
.TextReference_level_1 { font-size: 1.15em; }
"#;

const SITEMAP_JS: &str = r#"function tree_toggle(event) {
  event = event || window.event;
  var clicked = event.target || event.srcElement;
  if (!has_class(clicked, 'Expand')) {
    return;
  }
  var node = clicked.parentNode;
  if (has_class(node, 'ExpandLeaf')) {
    return;
  }
  var next = has_class(node, 'ExpandOpen') ? 'ExpandClosed' : 'ExpandOpen';
  node.className = node.className.replace(/(^|\s)(ExpandOpen|ExpandClosed)(\s|$)/, '$1' + next + '$3');
}

function has_class(element, name) {
  return new RegExp('(^|\\s)' + name + '(\\s|$)').test(element.className);
}
"#;
