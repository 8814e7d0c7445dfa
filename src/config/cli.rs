use crate::core::client::DEFAULT_ENDPOINT;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_output_dir, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "poi-fetch")]
#[command(about = "Download AMap POI search results into a CSV file")]
pub struct CliConfig {
    /// AMap web service key
    #[arg(long)]
    pub api_key: String,

    #[arg(long)]
    pub keywords: String,

    #[arg(long)]
    pub city: String,

    /// Existing directory that receives `{city}_{keywords}_pois.csv`
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = "500")]
    pub page_delay_ms: u64,

    /// Stop after this many pages; 0 means no limit
    #[arg(long, default_value = "100")]
    pub max_pages: u32,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn api_key(&self) -> &str {
        self.api_key.trim()
    }

    fn keywords(&self) -> &str {
        self.keywords.trim()
    }

    fn city(&self) -> &str {
        self.city.trim()
    }

    fn output_dir(&self) -> &str {
        self.output_dir.trim()
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    fn max_pages(&self) -> Option<u32> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_key", self.api_key())?;
        validate_non_empty_string("keywords", self.keywords())?;
        validate_non_empty_string("city", self.city())?;
        validate_url("endpoint", &self.endpoint)?;
        validate_output_dir(self.output_dir())
    }
}
