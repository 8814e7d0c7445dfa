use crate::core::client::DEFAULT_ENDPOINT;
use crate::core::pagination::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY};
use crate::core::ConfigProvider;
use crate::utils::error::{PoiError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_output_dir, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub query: QueryConfig,
    pub fetch: Option<FetchConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub key: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub keywords: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub page_delay_ms: Option<u64>,
    /// 0 表示不限制頁數
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
    pub file_name: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PoiError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PoiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AMAP_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("api.key", &self.api.key)?;
        if env_var_pattern().is_match(&self.api.key) {
            return Err(PoiError::InvalidConfigValueError {
                field: "api.key".to_string(),
                value: self.api.key.clone(),
                reason: "environment variable is not set".to_string(),
            });
        }
        validate_url("api.endpoint", self.endpoint())?;
        validate_non_empty_string("query.keywords", self.keywords())?;
        validate_non_empty_string("query.city", self.city())?;
        if let Some(file_name) = &self.output.file_name {
            validate_non_empty_string("output.file_name", file_name)?;
            if file_name.contains(['/', '\\']) {
                return Err(PoiError::InvalidConfigValueError {
                    field: "output.file_name".to_string(),
                    value: file_name.clone(),
                    reason: "File name must not contain path separators".to_string(),
                });
            }
        }
        validate_output_dir(self.output_dir())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_key(&self) -> &str {
        self.api.key.trim()
    }

    fn keywords(&self) -> &str {
        self.query.keywords.trim()
    }

    fn city(&self) -> &str {
        self.query.city.trim()
    }

    fn output_dir(&self) -> &str {
        self.output.directory.trim()
    }

    fn endpoint(&self) -> &str {
        self.api.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn page_delay(&self) -> Duration {
        self.fetch
            .as_ref()
            .and_then(|f| f.page_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PAGE_DELAY)
    }

    fn max_pages(&self) -> Option<u32> {
        match self.fetch.as_ref().and_then(|f| f.max_pages) {
            Some(0) => None,
            Some(max_pages) => Some(max_pages),
            None => Some(DEFAULT_MAX_PAGES),
        }
    }

    fn output_file_name(&self) -> String {
        match &self.output.file_name {
            Some(file_name) => file_name.clone(),
            None => crate::core::export::output_file_name(self.city(), self.keywords()),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
