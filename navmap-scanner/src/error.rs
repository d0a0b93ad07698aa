use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is not HTML (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// Whether a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScanError::HttpError(e) => e.is_timeout() || e.is_connect(),
            ScanError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryability() {
        let status = |status| ScanError::Status {
            url: "https://acme.test".to_string(),
            status,
        };
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!status(403).is_retryable());
    }

    #[test]
    fn test_content_errors_are_final() {
        let err = ScanError::NotHtml {
            url: "https://acme.test/feed".to_string(),
            content_type: "application/json".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "https://acme.test/feed is not HTML (content-type: application/json)"
        );
        assert!(!ScanError::InvalidUrl("nope".to_string()).is_retryable());
    }
}
