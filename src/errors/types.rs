use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Subdomain provider error: {0}")]
    Provider(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("No analyzable domain: {0}")]
    NoAnalyzableDomain(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Wordlist error: {0}")]
    Wordlist(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ReconError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReconError::Cancelled)
    }
}
