mod echo;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use densa_core::{Article, Extractor, ExtractorConfig, FetchConfig, fetch_file, fetch_stdin, fetch_url};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract the main article of a web page as JSON
#[derive(Parser, Debug)]
#[command(name = "densa")]
#[command(author = "Densa Contributors")]
#[command(version)]
#[command(about = "Extract the main article of a web page as JSON", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print single-line JSON instead of indented
    #[arg(long)]
    compact: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Log the score and statistics of every candidate node
    #[arg(long)]
    debug_density: bool,

    /// Weight scores by the log of the density standard deviation
    #[arg(long)]
    weight_by_std: bool,

    /// Keep image sources as written instead of resolving them against the URL
    #[arg(long)]
    no_resolve_urls: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn is_url(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }

    fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::builder()
            .debug_density(self.debug_density)
            .weight_by_density_std(self.weight_by_std)
            .resolve_urls(!self.no_resolve_urls)
            .build()
    }

    /// `RUST_LOG` wins; otherwise warnings only, or debug for our own crates with `-v`
    fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let mut directives = String::from(if self.verbose { "warn,densa_core=debug,densa=debug" } else { "warn" });
            if self.debug_density {
                directives.push_str(",densa::density=debug");
            }
            EnvFilter::new(directives)
        })
    }
}

async fn read_input(args: &Args) -> anyhow::Result<String> {
    if args.input == "-" {
        return fetch_stdin().context("Failed to read from stdin");
    }

    if args.is_url() {
        let mut config = FetchConfig { timeout: args.timeout, ..Default::default() };
        if let Some(user_agent) = &args.user_agent {
            config.user_agent = user_agent.clone();
        }
        return fetch_url(&args.input, &config).await.context("Failed to fetch URL");
    }

    fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))
}

fn render(article: &Article, compact: bool) -> anyhow::Result<String> {
    let json = if compact { article.to_json() } else { article.to_json_pretty() };
    json.context("Failed to serialize article")
}

async fn run(args: &Args) -> anyhow::Result<()> {
    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
        echo::print_step(1, 3, &format!("Reading {}", args.input.bright_white()));
    }

    let html = read_input(args).await?;

    if args.verbose {
        eprintln!("  {} {}\n", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
        echo::print_step(2, 3, "Extracting main content");
    }

    let extractor = Extractor::with_config(args.extractor_config());
    let started = Instant::now();
    let article = if args.is_url() {
        extractor.extract_with_url(&html, &args.input)
    } else {
        extractor.extract(&html)
    }
    .context("Failed to extract content")?;

    if args.verbose {
        echo::print_timing("Extraction", started.elapsed());
        echo::print_article_summary(&article);
        if article.title.is_empty() {
            echo::print_warning("No title found");
        }
        echo::print_step(3, 3, "Writing output");
    }

    let output = render(&article, args.compact)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{output}\n"))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{output}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "extraction failed");
            echo::print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_extractor_config_from_flags() {
        let args = Args::parse_from(["densa", "--weight-by-std", "--no-resolve-urls", "--debug-density", "page.html"]);
        let config = args.extractor_config();

        assert!(config.density.weight_by_density_std);
        assert!(config.density.debug);
        assert!(!config.resolve_urls);
        assert!(!args.is_url());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["densa", "https://example.com/a"]);
        assert!(args.is_url());
        assert_eq!(args.timeout, 30);
        assert!(!args.compact);
        assert!(args.extractor_config().resolve_urls);
    }
}
