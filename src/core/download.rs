use crate::config::storage::LocalStorage;
use crate::core::client::DEFAULT_ENDPOINT;
use crate::core::etl::EtlEngine;
use crate::core::pagination::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY};
use crate::core::pipeline::PoiPipeline;
use crate::core::{ConfigProvider, DownloadEvent, DownloadSummary};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_output_dir, validate_url, Validate,
};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Everything needed for one download, built by library callers.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub api_key: String,
    pub keywords: String,
    pub city: String,
    pub output_dir: String,
    pub endpoint: String,
    pub page_delay: Duration,
    pub max_pages: Option<u32>,
}

impl DownloadRequest {
    pub fn new(api_key: &str, keywords: &str, city: &str, output_dir: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            keywords: keywords.to_string(),
            city: city.to_string(),
            output_dir: output_dir.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_delay: DEFAULT_PAGE_DELAY,
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl ConfigProvider for DownloadRequest {
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
        self.page_delay
    }

    fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }
}

impl Validate for DownloadRequest {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_key", self.api_key())?;
        validate_non_empty_string("keywords", self.keywords())?;
        validate_non_empty_string("city", self.city())?;
        validate_url("endpoint", &self.endpoint)?;
        validate_output_dir(self.output_dir())
    }
}

/// Validates, fetches every page, and writes the CSV into the output directory.
pub async fn download_pois<C>(config: C) -> Result<DownloadSummary>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    run(config, None).await
}

/// Runs [`download_pois`] on a background task.
///
/// Progress arrives on the returned receiver; the channel closes when the
/// task finishes.
pub fn spawn_download<C>(
    config: C,
) -> (
    JoinHandle<Result<DownloadSummary>>,
    UnboundedReceiver<DownloadEvent>,
)
where
    C: ConfigProvider + Validate + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        config.validate()?;
        run(config, Some(tx)).await
    });
    (handle, rx)
}

async fn run<C: ConfigProvider>(
    config: C,
    events: Option<UnboundedSender<DownloadEvent>>,
) -> Result<DownloadSummary> {
    let storage = LocalStorage::new(config.output_dir().to_string());
    let pipeline = PoiPipeline::new(storage, config).with_events(events);
    EtlEngine::new(pipeline).run().await
}
