use crate::error::{Result, ScanError};
use crate::result::FetchResult;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Called before every attempt with the attempt number and the URL.
pub type ProgressCallback = Arc<dyn Fn(u32, String) + Send + Sync>;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANG: &str = "en-US,en;q=0.9";

pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
];

pub struct Fetcher {
    client: Client,
    user_agents: Vec<String>,
    next_agent: AtomicUsize,
    max_attempts: u32,
    retry_delay: Duration,
    progress_callback: Option<ProgressCallback>,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(15)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .cookie_store(true)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            next_agent: AtomicUsize::new(0),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            progress_callback: None,
        })
    }

    /// Replaces the rotation pool. An empty list keeps the current one.
    pub fn with_user_agents(mut self, agents: Vec<String>) -> Self {
        if !agents.is_empty() {
            self.user_agents = agents;
        }
        self
    }

    /// `attempts` counts the first try; the wait before retry `n` is
    /// `delay * 2^(n-1)`.
    pub fn with_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.max_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches an HTML page, retrying timeouts, connection failures, 429
    /// and 5xx responses.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!("{url}: unsupported scheme")));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            if let Some(ref callback) = self.progress_callback {
                callback(attempt, url.to_string());
            }

            match self.fetch_once(&parsed, attempt).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "Attempt {}/{} for {} failed: {} (retrying in {:?})",
                        attempt, self.max_attempts, url, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    fn next_user_agent(&self) -> &str {
        let index = self.next_agent.fetch_add(1, Ordering::Relaxed);
        &self.user_agents[index % self.user_agents.len()]
    }

    async fn fetch_once(&self, url: &Url, attempt: u32) -> Result<FetchResult> {
        let agent = self.next_user_agent();
        debug!("Fetching {} (attempt {}, UA {})", url, attempt, agent);

        let start = Instant::now();
        let response = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANG)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        if let Some(ref ct) = content_type
            && !is_html(ct)
        {
            return Err(ScanError::NotHtml {
                url: url.to_string(),
                content_type: ct.clone(),
            });
        }

        let mut result = FetchResult::new(url.to_string());
        result.final_url = response.url().to_string();
        result.status_code = status.as_u16();
        result.content_length = response.content_length();
        result.content_type = content_type;
        result.attempts = attempt;
        result.body = response.text().await?;
        result.response_time = start.elapsed();

        debug!(
            "Fetched {} ({} bytes in {:?})",
            result.final_url,
            result.body.len(),
            result.response_time
        );
        Ok(result)
    }
}

/// Servers that omit the header are given the benefit of the doubt.
fn is_html(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.contains("text/html") || ct.contains("application/xhtml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::{
        matchers::{header_exists, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const PAGE: &str = "<html><body><nav><a href=\"/a\">A</a></nav></body></html>";

    fn fast_fetcher() -> Fetcher {
        Fetcher::with_timeout(5)
            .unwrap()
            .with_retries(3, Duration::from_millis(10))
    }

    fn html_page() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8")
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("accept-language"))
            .respond_with(html_page())
            .mount(&mock_server)
            .await;

        let result = fast_fetcher().fetch(&mock_server.uri()).await.unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.body, PAGE);
        assert!(!result.was_redirected());
        assert!(result.content_type.unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_redirects_are_followed_and_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(html_page())
            .mount(&mock_server)
            .await;

        let url = format!("{}/old", mock_server.uri());
        let result = fast_fetcher().fetch(&url).await.unwrap();

        assert!(result.was_redirected());
        assert_eq!(result.url, url);
        assert_eq!(result.final_url, format!("{}/new", mock_server.uri()));
        assert_eq!(result.body, PAGE);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing", mock_server.uri());
        let err = fast_fetcher().fetch(&url).await.unwrap_err();

        assert!(matches!(err, ScanError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(html_page())
            .mount(&mock_server)
            .await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let fetcher = fast_fetcher().with_progress_callback(Arc::new(
            move |attempt: u32, _url: String| {
                seen_clone.lock().unwrap().push(attempt);
            },
        ));

        let url = format!("{}/flaky", mock_server.uri());
        let result = fetcher.fetch(&url).await.unwrap();

        assert_eq!(result.attempts, 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let err = fast_fetcher().fetch(&mock_server.uri()).await.unwrap_err();
        assert!(matches!(err, ScanError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_non_html_content_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/api", mock_server.uri());
        let err = fast_fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ScanError::NotHtml { .. }));
    }

    #[tokio::test]
    async fn test_invalid_urls() {
        let fetcher = fast_fetcher();
        assert!(matches!(
            fetcher.fetch("not a url").await,
            Err(ScanError::InvalidUrl(_))
        ));
        assert!(matches!(
            fetcher.fetch("ftp://acme.test/").await,
            Err(ScanError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_user_agents_rotate() {
        let fetcher = fast_fetcher().with_user_agents(vec!["one".to_string(), "two".to_string()]);
        let agents: Vec<String> = (0..3).map(|_| fetcher.next_user_agent().to_string()).collect();
        assert_eq!(agents, vec!["one", "two", "one"]);

        let unchanged = fast_fetcher().with_user_agents(Vec::new());
        assert_eq!(unchanged.user_agents.len(), DEFAULT_USER_AGENTS.len());
    }

    #[test]
    fn test_backoff_doubles() {
        let fetcher = Fetcher::with_timeout(5)
            .unwrap()
            .with_retries(4, Duration::from_millis(100));
        assert_eq!(fetcher.backoff(1), Duration::from_millis(100));
        assert_eq!(fetcher.backoff(2), Duration::from_millis(200));
        assert_eq!(fetcher.backoff(3), Duration::from_millis(400));
        assert_eq!(fetcher.max_attempts(), 4);
    }
}
