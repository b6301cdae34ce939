use super::types::ReconError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
    /// Whether the queue reports this as a failed entry rather than absorbing it.
    pub surfaced: bool,
}

impl ReconError {
    /// Classify this error to determine its type, whether it can be retried,
    /// and whether it fails the enclosing queue entry.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Transient, absorbed where they occur
            ReconError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
                surfaced: false,
            },
            ReconError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
                surfaced: false,
            },
            ReconError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                retryable: true,
                surfaced: false,
            },
            ReconError::Provider(_) => ErrorClassification {
                error_type: "ProviderError",
                retryable: true,
                surfaced: false,
            },

            // Cooperative stop, never retried and never reported as a failure
            ReconError::Cancelled => ErrorClassification {
                error_type: "Cancelled",
                retryable: false,
                surfaced: false,
            },

            ReconError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
                surfaced: false,
            },
            ReconError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
                surfaced: true,
            },
            ReconError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                retryable: false,
                surfaced: true,
            },
            ReconError::NoAnalyzableDomain(_) => ErrorClassification {
                error_type: "NoAnalyzableDomainError",
                retryable: false,
                surfaced: true,
            },
            ReconError::Wordlist(_) => ErrorClassification {
                error_type: "WordlistError",
                retryable: false,
                surfaced: true,
            },
            ReconError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                retryable: false,
                surfaced: true,
            },
            ReconError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: false,
                surfaced: true,
            },
            ReconError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
                surfaced: true,
            },
            ReconError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
                surfaced: true,
            },
            ReconError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
                surfaced: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_retryable_not_surfaced() {
        let class = ReconError::Network("connection reset".into()).classify();
        assert!(class.retryable);
        assert!(!class.surfaced);
        assert_eq!(class.error_type, "NetworkError");
    }

    #[test]
    fn test_cancelled_is_neither_retryable_nor_surfaced() {
        let class = ReconError::Cancelled.classify();
        assert!(!class.retryable);
        assert!(!class.surfaced);
    }

    #[test]
    fn test_rate_limit_retryable() {
        let class = ReconError::RateLimit("429".into()).classify();
        assert!(class.retryable);
        assert_eq!(class.error_type, "RateLimitError");
    }

    #[test]
    fn test_auth_error_not_retryable() {
        assert!(!ReconError::Authentication("bad key".into()).classify().retryable);
    }

    #[test]
    fn test_no_analyzable_domain_surfaced() {
        let class = ReconError::NoAnalyzableDomain("".into()).classify();
        assert!(class.surfaced);
        assert!(!class.retryable);
    }

    #[test]
    fn test_is_cancelled() {
        assert!(ReconError::Cancelled.is_cancelled());
        assert!(!ReconError::Timeout("slow".into()).is_cancelled());
    }
}
