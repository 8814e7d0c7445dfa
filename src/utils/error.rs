use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoiError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed API response: {message}")]
    MalformedResponse { message: String },

    #[error("Transport failure on page {page}: {message}")]
    TransportFailure { page: u32, message: String },

    #[error("Upstream rejected the query (status {status}): {info}")]
    UpstreamRejected { status: String, info: String },

    #[error("No POIs found for '{keywords}' in '{city}'")]
    NoData { keywords: String, city: String },

    #[error("Output directory does not exist: {path}")]
    OutputDirMissing { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used by callers to report outcomes separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Upstream,
    NoData,
    Filesystem,
    Configuration,
}

impl PoiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PoiError::Http(_)
            | PoiError::MalformedResponse { .. }
            | PoiError::TransportFailure { .. } => ErrorCategory::Transport,
            PoiError::UpstreamRejected { .. } => ErrorCategory::Upstream,
            PoiError::NoData { .. } => ErrorCategory::NoData,
            PoiError::OutputDirMissing { .. } | PoiError::CsvError(_) | PoiError::IoError(_) => {
                ErrorCategory::Filesystem
            }
            PoiError::ConfigError { .. } | PoiError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("無法連線到地圖服務: {}", self),
            ErrorCategory::Upstream => format!("地圖服務拒絕了查詢: {}", self),
            ErrorCategory::NoData => "未找到相關數據".to_string(),
            ErrorCategory::Filesystem => format!("檔案寫入失敗: {}", self),
            ErrorCategory::Configuration => format!("配置錯誤: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PoiError::UpstreamRejected { .. } => {
                "Check that the API key is valid and has quota left for the place search service"
            }
            PoiError::NoData { .. } => "Try broader keywords or a different city name",
            PoiError::OutputDirMissing { .. } => "Create the output directory or choose an existing one",
            _ => match self.category() {
                ErrorCategory::Transport => "Check the network connection and the endpoint URL",
                ErrorCategory::Filesystem => "Make sure the output location is writable",
                ErrorCategory::Configuration => "Review the command line arguments or config file",
                _ => "Run again with --verbose for more details",
            },
        }
    }

    /// 根據錯誤類別決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::NoData => 2,
            ErrorCategory::Transport | ErrorCategory::Upstream => 3,
            ErrorCategory::Filesystem => 4,
            ErrorCategory::Configuration => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_distinguishable() {
        let no_data = PoiError::NoData {
            keywords: "coffee".to_string(),
            city: "Beijing".to_string(),
        };
        let transport = PoiError::TransportFailure {
            page: 1,
            message: "connection refused".to_string(),
        };
        let filesystem = PoiError::OutputDirMissing {
            path: "/nowhere".to_string(),
        };

        assert_eq!(no_data.category(), ErrorCategory::NoData);
        assert_eq!(transport.category(), ErrorCategory::Transport);
        assert_eq!(filesystem.category(), ErrorCategory::Filesystem);
        assert_ne!(no_data.exit_code(), transport.exit_code());
        assert_ne!(transport.exit_code(), filesystem.exit_code());
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let parse = PoiError::ConfigError {
            message: "bad toml".to_string(),
        };
        let invalid = PoiError::InvalidConfigValueError {
            field: "api.key".to_string(),
            value: "${AMAP_KEY}".to_string(),
            reason: "environment variable is not set".to_string(),
        };

        for err in [parse, invalid] {
            assert_eq!(err.category(), ErrorCategory::Configuration);
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = PoiError::UpstreamRejected {
            status: "0".to_string(),
            info: "INVALID_USER_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Upstream rejected the query (status 0): INVALID_USER_KEY"
        );
        assert!(err.user_friendly_message().contains("INVALID_USER_KEY"));
    }
}
