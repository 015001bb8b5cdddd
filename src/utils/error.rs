use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzbaError {
    #[error("Failed to retrieve schedule page: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Failed to retrieve schedule page: {url} answered {status}")]
    UpstreamStatusError { url: String, status: u16 },

    #[error("Active zones list block not found (marker: {marker})")]
    SectionNotFound { marker: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used by the binary and the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FetchFailure,
    SectionNotFound,
    Configuration,
    Internal,
}

impl AzbaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AzbaError::FetchError(_) | AzbaError::UpstreamStatusError { .. } => {
                ErrorKind::FetchFailure
            }
            AzbaError::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            AzbaError::ConfigError { .. } | AzbaError::InvalidConfigValueError { .. } => {
                ErrorKind::Configuration
            }
            AzbaError::IoError(_) => ErrorKind::Internal,
        }
    }

    /// Whether this error ends a schedule request with no partial output.
    pub fn is_fatal_for_request(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::FetchFailure | ErrorKind::SectionNotFound
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::FetchFailure => "Check network access to the source page and try again",
            ErrorKind::SectionNotFound => {
                "The source page layout may have changed; inspect it with `fetch --input`"
            }
            ErrorKind::Configuration => "Fix the configuration file or command-line flags",
            ErrorKind::Internal => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, AzbaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_not_found_is_fatal() {
        let err = AzbaError::SectionNotFound {
            marker: "Liste des zones activées".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::SectionNotFound);
        assert!(err.is_fatal_for_request());
        assert!(err.to_string().contains("Active zones list block not found"));
    }

    #[test]
    fn test_upstream_status_is_fetch_failure() {
        let err = AzbaError::UpstreamStatusError {
            url: "http://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.kind(), ErrorKind::FetchFailure);
        assert!(err.is_fatal_for_request());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_config_errors_are_not_request_errors() {
        let err = AzbaError::ConfigError {
            message: "TOML parsing error".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_fatal_for_request());
    }
}
