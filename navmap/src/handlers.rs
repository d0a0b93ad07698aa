use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use navmap_core::config::{ScraperConfig, DEFAULT_CONFIG_PATH};
use navmap_core::report::{build_document, timestamp, OutputConvention};
use navmap_engine::{Extraction, NavError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

// Re-export scrape types and functions from navmap-core
pub use navmap_core::report::generate_scrape_report;
pub use navmap_core::scrape::{
    analyze_html, execute_scrape, site_domain, OutcomeStatus, ScrapeOptions, SiteOutcome,
};

/// Exit status of `extract` when the navigation is rejected or missing.
pub const EXIT_REJECTED: i32 = 2;

/// Log filter for a `-v` count, used when `RUST_LOG` is unset.
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// Helper functions for scrape handler

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&Url>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    // Scheme-less "host:port" parses with the host as scheme
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("⚠️  Skipping invalid URL '{}'", line);
    None
}

/// Loads the config at `path`, or the default location when it exists, or
/// built-in defaults.
pub fn load_config(path: Option<&PathBuf>) -> Result<ScraperConfig> {
    if let Some(path) = path {
        debug!("Loading config from {}", path.display());
        return ScraperConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default_path = expand_path(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        ScraperConfig::load(&default_path)
            .with_context(|| format!("Failed to load config {}", default_path.display()))
    } else {
        Ok(ScraperConfig::default())
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn flag(args: &ArgMatches, name: &str) -> bool {
    matches!(args.try_get_one::<bool>(name), Ok(Some(true)))
}

/// Applies command-line flags on top of the loaded config.
pub fn apply_overrides(config: &mut ScraperConfig, args: &ArgMatches) {
    if let Ok(Some(name)) = args.try_get_one::<String>("convention")
        && let Some(convention) = OutputConvention::from_name(name)
    {
        config.output.convention = convention;
    }
    if let Ok(Some(dir)) = args.try_get_one::<PathBuf>("output") {
        config.output.dir = dir.clone();
    }
    if flag(args, "footer-fallback") {
        config.footer_fallback = true;
    }
    if flag(args, "no-resume") {
        config.output.resume = false;
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_divider();
    println!("{}", "  NAVMAP INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let raw_path = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);
    let force = args.get_flag("force");
    let config_path = expand_path(raw_path);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_path.display().to_string().bright_white()
    );
    println!();

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!(
            "Config file already exists: {}",
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Overwrite it with the defaults? [y/N]:")?;
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
    }

    write_default_config(&config_path)?;

    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Config file: {}",
        "✓".green().bold(),
        config_path.display().to_string().bright_white()
    );
    println!();
    Ok(())
}

pub fn write_default_config(path: &Path) -> Result<()> {
    ScraperConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub async fn handle_scrape(sub_matches: &ArgMatches) -> Result<()> {
    let url = sub_matches.get_one::<Url>("url");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let quiet = flag(sub_matches, "quiet");

    let urls = load_urls_from_source(url, hosts_file).map_err(anyhow::Error::msg)?;
    let mut config = load_config(sub_matches.get_one::<PathBuf>("config"))?;
    apply_overrides(&mut config, sub_matches);
    let threads = sub_matches
        .get_one::<usize>("threads")
        .copied()
        .unwrap_or(config.workers);

    if !quiet {
        println!("\n🧭 Scraping {} site(s)", urls.len());
        println!("Workers: {}", threads);
        println!("Output: {}", config.output.dir.display());
        println!("Convention: {}", config.output.convention.as_str());
        println!(
            "Footer fallback: {}\n",
            if config.footer_fallback { "on" } else { "off" }
        );
    }

    let options = ScrapeOptions {
        urls,
        threads,
        config,
        show_progress_bars: !quiet,
    };

    let outcomes = execute_scrape(options, None, None)
        .await
        .map_err(|e| anyhow::anyhow!("Scrape failed: {}", e))?;

    if !quiet {
        println!("\n{} Scrape complete!\n", "✓".green().bold());
    }
    print!("{}", generate_scrape_report(&outcomes));
    Ok(())
}

/// Runs the engine over a saved HTML file.
pub fn extract_file(path: &Path, base_url: &str, config: &ScraperConfig) -> Result<Extraction, ExtractFailure> {
    let html = fs::read_to_string(path)
        .map_err(|e| ExtractFailure::Fatal(format!("Failed to read {}: {}", path.display(), e)))?;
    analyze_html(&html, base_url, config).map_err(|e| match e {
        NavError::NoNavigation(reason) => ExtractFailure::NoNavigation(reason),
        other => ExtractFailure::Fatal(other.to_string()),
    })
}

#[derive(Debug)]
pub enum ExtractFailure {
    NoNavigation(String),
    Fatal(String),
}

/// Pretty JSON document for an extraction, in the chosen convention.
pub fn render_extraction(extraction: &Extraction, website: &str, convention: OutputConvention) -> Result<String> {
    let domain = site_domain(website).unwrap_or_else(|| website.to_string());
    let document = build_document(website, &domain, extraction, convention, timestamp());
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Returns the process exit status: 0 when accepted, 2 when rejected.
pub fn handle_extract(sub_matches: &ArgMatches) -> Result<i32> {
    let file = sub_matches
        .get_one::<PathBuf>("file")
        .context("--file is required")?;
    let base_url = sub_matches
        .get_one::<Url>("base-url")
        .context("--base-url is required")?;

    let mut config = load_config(sub_matches.get_one::<PathBuf>("config"))?;
    apply_overrides(&mut config, sub_matches);

    let extraction = match extract_file(file, base_url.as_str(), &config) {
        Ok(extraction) => extraction,
        Err(ExtractFailure::NoNavigation(reason)) => {
            eprintln!("{} No navigation found: {}", "✗".red().bold(), reason);
            return Ok(EXIT_REJECTED);
        }
        Err(ExtractFailure::Fatal(message)) => anyhow::bail!(message),
    };

    println!(
        "{}",
        render_extraction(&extraction, base_url.as_str(), config.output.convention)?
    );

    if extraction.is_accepted() {
        eprintln!("{} {}", "✓".green().bold(), extraction.verdict.reason);
        Ok(0)
    } else {
        eprintln!("{} Rejected: {}", "⚠".yellow().bold(), extraction.verdict.reason);
        Ok(EXIT_REJECTED)
    }
}
