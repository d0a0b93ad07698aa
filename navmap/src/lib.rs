// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_config, load_urls_from_file, load_urls_from_source, parse_url_line};

// Re-export scrape functionality from navmap-core
pub use navmap_core::scrape::{
    analyze_html, execute_scrape, OutcomeCallback, ScrapeOptions, ScrapeProgressCallback,
    SiteOutcome,
};
