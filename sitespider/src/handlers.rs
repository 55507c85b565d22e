use clap::ArgMatches;
use colored::Colorize;
use sitespider_core::crawl::{CrawlOptions, execute_crawl, generate_crawl_report};
use sitespider_core::crawler::{CrawlConfig, MAX_DELAY_SECS};
use sitespider_core::report::{ReportData, ReportFormat, generate_report, save_report};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Crawl arguments as given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlArgs {
    pub url: String,
    pub depth: usize,
    pub delay: f64,
    pub attempts: u32,
    pub retry_delay: f64,
    pub ignore_robots: bool,
    pub user_agent: String,
    pub timeout: u64,
    pub output: Option<String>,
    pub format: Option<String>,
    pub log_file: Option<String>,
}

impl CrawlArgs {
    pub fn from_matches(args: &ArgMatches) -> Self {
        let config_defaults = CrawlConfig::default();
        Self {
            url: args.get_one::<String>("url").cloned().unwrap_or_default(),
            depth: args.get_one::<usize>("depth").copied().unwrap_or(0),
            delay: args.get_one::<f64>("delay").copied().unwrap_or(0.0),
            attempts: args
                .get_one::<u32>("attempts")
                .copied()
                .unwrap_or(config_defaults.connection_attempts),
            retry_delay: args
                .get_one::<f64>("retry-delay")
                .copied()
                .unwrap_or(config_defaults.retry_delay),
            ignore_robots: args.get_flag("ignore-robots"),
            user_agent: args
                .get_one::<String>("user-agent")
                .cloned()
                .unwrap_or(config_defaults.user_agent),
            timeout: args
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(config_defaults.timeout_secs),
            output: args.get_one::<String>("output").cloned(),
            format: args.get_one::<String>("format").cloned(),
            log_file: args.get_one::<String>("log-file").cloned(),
        }
    }

    pub fn to_config(&self) -> Result<CrawlConfig, String> {
        let homepage = parse_url_line(&self.url)
            .ok_or_else(|| format!("Invalid homepage URL '{}'", self.url))?;

        Ok(CrawlConfig::new(homepage)
            .with_depth_limit(self.depth)
            .with_download_delay(self.delay)
            .with_connection_attempts(self.attempts)
            .with_retry_delay(self.retry_delay)
            .with_obey_robots(!self.ignore_robots)
            .with_user_agent(self.user_agent.as_str())
            .with_timeout(self.timeout))
    }
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    match Url::parse(&with_scheme) {
        Ok(url) if url.has_host() => Some(with_scheme),
        _ => None,
    }
}

/// Value parser for `--delay` and `--retry-delay`
pub fn parse_delay(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;

    if !seconds.is_finite() || !(0.0..=MAX_DELAY_SECS).contains(&seconds) {
        return Err(format!("delay must be between 0 and {} seconds", MAX_DELAY_SECS));
    }
    Ok(seconds)
}

/// Expand `~` and environment variables in a user supplied path
pub fn resolve_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// An explicit format wins; otherwise the output file extension decides.
/// Files with an unknown extension get the HTML sitemap, the screen gets text.
pub fn select_report_format(
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<ReportFormat, String> {
    if let Some(format) = format {
        return ReportFormat::from_str(format).ok_or_else(|| format!("Unknown report format '{}'", format));
    }

    Ok(match output {
        Some(path) => ReportFormat::from_path(path).unwrap_or(ReportFormat::Html),
        None => ReportFormat::Text,
    })
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` picks the level. Without it the log file gets `info` and the
/// terminal only `warn`, so the spinner stays readable.
pub fn init_logging(log_file: Option<&Path>) -> Result<(), String> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to create log file {}: {}", path.display(), e))?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| format!("Failed to initialize logging: {}", e))
        }
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| format!("Failed to initialize logging: {}", e))
        }
    }
}

pub fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "{} {}",
        "  SITESPIDER".bright_white().bold(),
        format!("v{} - single-site sitemap crawler", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    std::process::exit(1);
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) {
    let args = CrawlArgs::from_matches(sub_matches);

    let log_file = args.log_file.as_deref().map(resolve_output_path);
    if let Err(e) = init_logging(log_file.as_deref()) {
        fail(&e);
    }

    let config = args.to_config().unwrap_or_else(|e| fail(&e));
    let output = args.output.as_deref().map(resolve_output_path);
    let format = select_report_format(args.format.as_deref(), output.as_deref())
        .unwrap_or_else(|e| fail(&e));

    if !quiet {
        println!("\n🕷️  Crawling {}", config.homepage.bright_white());
        let depth = if config.depth_limit == 0 {
            "unlimited".to_string()
        } else {
            config.depth_limit.to_string()
        };
        println!("Max depth: {}", depth);
        println!("Download delay: {}s", config.download_delay);
        println!(
            "robots.txt: {}\n",
            if config.obey_robots { "obeyed" } else { "ignored" }
        );
    }

    let options = CrawlOptions {
        config,
        show_progress_bars: !quiet,
    };

    let summary = match execute_crawl(options, None).await {
        Ok(summary) => summary,
        Err(e) => fail(&format!("Crawl failed: {}", e)),
    };

    if !quiet {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
        print!("{}", generate_crawl_report(&summary));
    }

    let Some(data) = ReportData::from_summary(&summary) else {
        fail("Sitemap was not created: the homepage has no title");
    };

    let report = generate_report(&data, format).unwrap_or_else(|e| fail(&e));

    match output {
        Some(path) => {
            if let Err(e) = save_report(&report, &path) {
                fail(&format!("Failed to save report to {}: {}", path.display(), e));
            }
            println!(
                "{} Sitemap saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }
}
