//! Sumi-Glean main entry point
//!
//! This is the command-line interface for the Sumi-Glean contact gleaner.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use sumi_glean::config::{default_config, load_config, Config};
use sumi_glean::output::{print_crawl_report, print_page_report, to_json};
use sumi_glean::pipeline::{ExtractOptions, Pipeline};
use tracing_subscriber::EnvFilter;

/// Sumi-Glean: A polite contact gleaner
///
/// Sumi-Glean fetches pages while respecting robots.txt, optionally follows
/// their links, and extracts emails, phone numbers, postal addresses and
/// social profiles with local patterns or a language model.
#[derive(Parser, Debug)]
#[command(name = "sumi-glean")]
#[command(version)]
#[command(about = "A polite contact gleaner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract contact details from a single page
    Run {
        /// Page to fetch
        url: String,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Crawl from a seed page and extract from every page reached
    Crawl {
        /// Seed page
        url: String,

        /// Maximum link hops from the seed (defaults to crawler.max-depth)
        #[arg(short, long)]
        depth: Option<u32>,

        #[command(flatten)]
        extract: ExtractArgs,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Render pages with a headless browser before extracting
    #[arg(long)]
    render_js: bool,

    /// Extraction strategy
    #[arg(short, long, value_enum, default_value_t = Method::Pattern)]
    method: Method,

    /// Add an outreach summary from the language model
    #[arg(long)]
    summarize: bool,

    /// Extra named pattern to apply, as NAME=REGEX (repeatable)
    #[arg(short = 'e', long = "extract", value_name = "NAME=REGEX", value_parser = parse_pattern)]
    patterns: Vec<(String, String)>,

    /// Print JSON instead of a plain listing
    #[arg(long)]
    json: bool,

    /// Also write the JSON output to this file
    #[arg(short, long, value_name = "FILE", requires = "json")]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Method {
    /// Local pattern matching
    Pattern,
    /// Language model extraction
    Service,
}

impl Method {
    fn name(self) -> &'static str {
        match self {
            Method::Pattern => "pattern",
            Method::Service => "service",
        }
    }
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            method: self.method.name().to_string(),
            render_js: self.render_js,
            summarize: self.summarize,
            patterns: self.patterns.clone(),
        }
    }

    fn needs_service(&self) -> bool {
        self.method == Method::Service || self.summarize
    }
}

fn parse_pattern(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, pattern)) if !name.trim().is_empty() && !pattern.is_empty() => {
            Ok((name.trim().to_string(), pattern.to_string()))
        }
        _ => Err(format!("expected NAME=REGEX, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Run { url, extract } => handle_run(config, &url, &extract).await,
        Command::Crawl {
            url,
            depth,
            extract,
        } => handle_crawl(config, &url, depth, &extract).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_glean=info,warn"),
            1 => EnvFilter::new("sumi_glean=debug,info"),
            2 => EnvFilter::new("sumi_glean=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => default_config().context("Invalid default configuration"),
    }
}

/// Builds the pipeline, opening the text service and renderer if needed
async fn build_pipeline(config: Config, args: &ExtractArgs) -> anyhow::Result<Pipeline> {
    let mut pipeline = Pipeline::new(config)?;

    if args.needs_service() {
        pipeline = pipeline.open_service()?;
    }

    if args.render_js {
        pipeline = attach_renderer(pipeline).await?;
    }

    Ok(pipeline)
}

#[cfg(feature = "chromium")]
async fn attach_renderer(pipeline: Pipeline) -> anyhow::Result<Pipeline> {
    use std::sync::Arc;
    use sumi_glean::fetcher::ChromiumRenderer;

    tracing::info!("Launching headless browser");
    let renderer = ChromiumRenderer::launch().await?;
    Ok(pipeline.with_renderer(Arc::new(renderer)))
}

#[cfg(not(feature = "chromium"))]
async fn attach_renderer(_pipeline: Pipeline) -> anyhow::Result<Pipeline> {
    anyhow::bail!("--render-js requires building with the `chromium` feature")
}

/// Handles the `run` subcommand
async fn handle_run(config: Config, url: &str, args: &ExtractArgs) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config, args).await?;

    let report = match pipeline.run(url, &args.options()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Extraction failed: {}", e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", to_json(&report, args.output.as_deref())?);
    } else {
        print_page_report(&report);
    }

    Ok(())
}

/// Handles the `crawl` subcommand
async fn handle_crawl(
    config: Config,
    url: &str,
    depth: Option<u32>,
    args: &ExtractArgs,
) -> anyhow::Result<()> {
    let depth = depth.unwrap_or(config.crawler.max_depth);
    let pipeline = build_pipeline(config, args).await?;

    let report = match pipeline.crawl(url, depth, &args.options()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !report.skipped.is_empty() {
        tracing::warn!("{} pages were skipped", report.skipped.len());
    }

    if args.json {
        println!("{}", to_json(&report.contacts_by_url(), args.output.as_deref())?);
    } else {
        print_crawl_report(&report);
    }

    Ok(())
}
