use crate::config::ScraperConfig;
use crate::report;
use indicatif::{ProgressBar, ProgressStyle};
use navmap_engine::{Extraction, Html, NavError, SearchMode};
use navmap_scanner::Fetcher;
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

/// Options for configuring a scrape run
pub struct ScrapeOptions {
    pub urls: Vec<String>,
    pub threads: usize,
    pub config: ScraperConfig,
    pub show_progress_bars: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Accepted,
    Rejected,
    Failed,
    /// Resume mode found an existing success document.
    Skipped,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Accepted => "accepted",
            OutcomeStatus::Rejected => "rejected",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::Skipped => "skipped",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            OutcomeStatus::Accepted => "✓",
            OutcomeStatus::Rejected => "⚠",
            OutcomeStatus::Failed => "✗",
            OutcomeStatus::Skipped => "↪",
        }
    }
}

/// What happened to one input URL.
#[derive(Debug, Clone, Serialize)]
pub struct SiteOutcome {
    pub url: String,
    pub domain: String,
    pub status: OutcomeStatus,
    pub reason: String,
    /// Where the page was finally served from, when that differs from `url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_to: Option<String>,
    #[serde(skip)]
    pub extraction: Option<Extraction>,
}

impl SiteOutcome {
    fn new(url: &str, domain: &str, status: OutcomeStatus, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            domain: domain.to_string(),
            status,
            reason: reason.into(),
            redirected_to: None,
            extraction: None,
        }
    }

    fn from_extraction(url: &str, domain: &str, extraction: Extraction) -> Self {
        let status = if extraction.is_accepted() {
            OutcomeStatus::Accepted
        } else {
            OutcomeStatus::Rejected
        };
        Self {
            reason: extraction.verdict.reason.clone(),
            extraction: Some(extraction),
            ..Self::new(url, domain, status, String::new())
        }
    }
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Callback for reporting each site's outcome as it completes
pub type OutcomeCallback = Arc<dyn Fn(&SiteOutcome) + Send + Sync>;

/// The site's domain without `www.`, used to key output files.
pub fn site_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(navmap_engine::validate::site_domain)
}

/// Parses `html` and extracts its navigation with the site's overrides.
///
/// Runs the primary pass first; when that finds no navigation and
/// `footer_fallback` is on, retries in footer mode.
pub fn analyze_html(html: &str, url: &str, config: &ScraperConfig) -> navmap_engine::Result<Extraction> {
    analyze_page(html, url, url, config)
}

/// Like [`analyze_html`] for a page requested as `site_url` and served from
/// `url`: links resolve against `url`, overrides come from `site_url`.
pub fn analyze_page(
    html: &str,
    url: &str,
    site_url: &str,
    config: &ScraperConfig,
) -> navmap_engine::Result<Extraction> {
    let extractor = config.extractor_for_page(site_url, url)?;
    let document = Html::parse_document(html);

    match extractor.extract(&document, url, SearchMode::Primary) {
        Err(NavError::NoNavigation(primary)) if config.footer_fallback => {
            debug!("{}: no primary navigation ({}), trying footer", url, primary);
            extractor
                .extract(&document, url, SearchMode::Footer)
                .map_err(|e| match e {
                    NavError::NoNavigation(footer) => {
                        NavError::NoNavigation(format!("{primary}; footer: {footer}"))
                    }
                    other => other,
                })
        }
        other => other,
    }
}

/// Execute a scrape with the given options
/// Returns one outcome per input URL, in input order
pub async fn execute_scrape(
    options: ScrapeOptions,
    progress_callback: Option<ScrapeProgressCallback>,
    outcome_callback: Option<OutcomeCallback>,
) -> Result<Vec<SiteOutcome>, String> {
    let ScrapeOptions {
        urls,
        threads,
        config,
        show_progress_bars,
    } = options;

    if urls.is_empty() {
        return Err("No URLs provided".to_string());
    }

    fs::create_dir_all(&config.output.dir).map_err(|e| {
        format!(
            "Failed to create output directory {}: {}",
            config.output.dir.display(),
            e
        )
    })?;

    let fetcher = Fetcher::with_timeout(config.fetch.timeout_secs)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?
        .with_user_agents(config.fetch.user_agents.clone())
        .with_retries(
            config.fetch.retry_attempts,
            Duration::from_millis(config.fetch.retry_delay_ms),
        );
    let fetcher = Arc::new(fetcher);

    let total = urls.len();
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| e.to_string())?
                .progress_chars("=>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting scrape...");
        Some(pb)
    } else {
        None
    };

    info!("Scraping {} site(s) with {} workers", total, threads);

    let semaphore = Arc::new(Semaphore::new(threads.max(1)));
    let config = Arc::new(config);
    let completed = Arc::new(AtomicUsize::new(0));
    let mut tasks = Vec::with_capacity(total);

    for url in urls {
        let semaphore = semaphore.clone();
        let fetcher = fetcher.clone();
        let config = config.clone();
        let completed = completed.clone();
        let progress_bar = progress_bar.clone();
        let progress_callback = progress_callback.clone();
        let outcome_callback = outcome_callback.clone();

        tasks.push(tokio::spawn(async move {
            let domain = site_domain(&url).unwrap_or_else(|| url.clone());
            let Ok(_permit) = semaphore.acquire().await else {
                return SiteOutcome::new(&url, &domain, OutcomeStatus::Failed, "worker pool closed");
            };

            if let Some(ref callback) = progress_callback {
                callback(format!("Scraping {}", url));
            }

            let mut outcome = scrape_site(&fetcher, &url, &domain, &config).await;
            if outcome.status != OutcomeStatus::Skipped
                && let Err(e) = report::write_outcome(&outcome, &config.output)
            {
                warn!("Failed to write output for {}: {}", domain, e);
                outcome = SiteOutcome::new(
                    &url,
                    &domain,
                    OutcomeStatus::Failed,
                    format!("failed to write output: {}", e),
                );
            }

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
                pb.set_message(format!("{} {}", outcome.status.marker(), domain));
            }
            debug!("[{}/{}] {} {}", done, total, domain, outcome.status.as_str());

            if let Some(ref callback) = outcome_callback {
                callback(&outcome);
            }
            outcome
        }));
    }

    let mut outcomes = Vec::with_capacity(total);
    for task in tasks {
        let outcome = task
            .await
            .map_err(|e| format!("Worker task failed: {}", e))?;
        outcomes.push(outcome);
    }

    if let Some(ref pb) = progress_bar {
        let accepted = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Accepted)
            .count();
        pb.finish_with_message(format!("Scrape complete! {}/{} accepted", accepted, total));
    }

    Ok(outcomes)
}

async fn scrape_site(fetcher: &Fetcher, url: &str, domain: &str, config: &ScraperConfig) -> SiteOutcome {
    if config.output.resume && report::already_scraped(&config.output.dir, domain) {
        debug!("Skipping {} (already scraped)", domain);
        return SiteOutcome::new(url, domain, OutcomeStatus::Skipped, "already scraped");
    }

    if config.fetch.rate_limit_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.fetch.rate_limit_ms)).await;
    }

    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Fetch failed for {}: {}", url, e);
            return SiteOutcome::new(url, domain, OutcomeStatus::Failed, e.to_string());
        }
    };

    let redirected_to = if page.was_redirected() {
        info!("{} redirected to {}", url, page.final_url);
        Some(page.final_url.clone())
    } else {
        None
    };

    let outcome = match analyze_page(&page.body, &page.final_url, url, config) {
        Ok(extraction) => SiteOutcome::from_extraction(url, domain, extraction),
        Err(NavError::NoNavigation(reason)) => SiteOutcome::new(
            url,
            domain,
            OutcomeStatus::Rejected,
            format!("No navigation found: {}", reason),
        ),
        Err(e) => SiteOutcome::new(url, domain, OutcomeStatus::Failed, e.to_string()),
    };
    SiteOutcome {
        redirected_to,
        ..outcome
    }
}
