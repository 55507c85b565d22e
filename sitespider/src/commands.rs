use crate::CLAP_STYLING;
use clap::{arg, command};
use sitespider::handlers::parse_delay;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitespider")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitespider")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a single website from its homepage and build a sitemap of page titles \
                and headline-labelled link groups.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The homepage to start from (http:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum click depth below the homepage, 0 for unlimited")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    arg!(--"delay" <SECONDS>)
                        .required(false)
                        .help("Average politeness pause after each request; randomized between 0.5x and 1.5x")
                        .value_parser(parse_delay)
                        .default_value("0"),
                )
                .arg(
                    arg!(--"attempts" <NUM>)
                        .required(false)
                        .help("Connection attempts per URL before the crawl is aborted")
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .default_value("3"),
                )
                .arg(
                    arg!(--"retry-delay" <SECONDS>)
                        .required(false)
                        .help("Pause between two connection attempts")
                        .value_parser(parse_delay)
                        .default_value("5"),
                )
                .arg(
                    arg!(--"ignore-robots")
                        .required(false)
                        .help("Do not download or obey the site's robots.txt")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"user-agent" <UA>)
                        .required(false)
                        .help("User-Agent header, also matched against robots.txt groups")
                        .default_value("SiteSpider/1.0"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the sitemap to a file (default: display to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown, html (default: from the output extension)")
                        .value_parser(["text", "json", "markdown", "md", "html"]),
                )
                .arg(
                    arg!(--"log-file" <PATH>)
                        .required(false)
                        .help("Write the diagnostic log to a file instead of the terminal"),
                ),
        )
}
