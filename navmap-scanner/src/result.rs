use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A successfully fetched HTML page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// The URL that was requested.
    pub url: String,
    /// Where the request ended up after redirects.
    pub final_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub response_time: Duration,
    pub attempts: u32,
    #[serde(skip)]
    pub body: String,
}

impl FetchResult {
    pub fn new(url: String) -> Self {
        Self {
            final_url: url.clone(),
            url,
            status_code: 0,
            content_type: None,
            content_length: None,
            response_time: Duration::from_secs(0),
            attempts: 0,
            body: String::new(),
        }
    }

    pub fn was_redirected(&self) -> bool {
        self.final_url != self.url
    }
}
