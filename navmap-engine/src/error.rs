use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid container selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid class pattern: {0}")]
    InvalidPattern(String),

    #[error("No primary navigation found: {0}")]
    NoNavigation(String),

    #[error("Navigation rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
