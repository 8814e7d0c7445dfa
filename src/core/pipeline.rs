use crate::core::client::AmapClient;
use crate::core::export::CsvExporter;
use crate::core::normalize::normalize;
use crate::core::pagination::Paginator;
use crate::core::{
    ConfigProvider, DownloadEvent, ExportOutcome, FetchReport, NormalizedPoiRecord, Pipeline,
    PoiSource, RawPoiRecord, Storage,
};
use crate::utils::error::Result;
use tokio::sync::mpsc::UnboundedSender;

/// Fetch → normalize → CSV pipeline for one keyword/city query.
pub struct PoiPipeline<S: Storage, C: ConfigProvider, Q: PoiSource = AmapClient> {
    exporter: CsvExporter<S>,
    config: C,
    source: Q,
    events: Option<UnboundedSender<DownloadEvent>>,
}

impl<S: Storage, C: ConfigProvider> PoiPipeline<S, C, AmapClient> {
    pub fn new(storage: S, config: C) -> Self {
        let source = AmapClient::with_endpoint(config.endpoint(), config.api_key());
        Self::with_source(storage, config, source)
    }
}

impl<S: Storage, C: ConfigProvider, Q: PoiSource> PoiPipeline<S, C, Q> {
    pub fn with_source(storage: S, config: C, source: Q) -> Self {
        Self {
            exporter: CsvExporter::new(storage),
            config,
            source,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Option<UnboundedSender<DownloadEvent>>) -> Self {
        self.events = events;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, Q: PoiSource> Pipeline for PoiPipeline<S, C, Q> {
    async fn preflight(&self) -> Result<()> {
        self.exporter.storage().ensure_ready()
    }

    async fn extract(&self) -> Result<FetchReport> {
        tracing::info!(
            "🚀 Searching '{}' in '{}'",
            self.config.keywords(),
            self.config.city()
        );

        let report = Paginator::new(&self.source)
            .with_page_delay(self.config.page_delay())
            .with_max_pages(self.config.max_pages())
            .with_events(self.events.clone())
            .fetch_all(self.config.keywords(), self.config.city())
            .await;

        tracing::info!("📊 Extracted {} records", report.records.len());
        Ok(report)
    }

    async fn transform(&self, data: Vec<RawPoiRecord>) -> Result<Vec<NormalizedPoiRecord>> {
        tracing::debug!("🔧 Normalizing {} records", data.len());
        Ok(normalize(&data))
    }

    async fn load(&self, records: Vec<NormalizedPoiRecord>) -> Result<ExportOutcome> {
        let file_name = self.config.output_file_name();
        let outcome = self.exporter.export(&records, &file_name).await?;

        if let (ExportOutcome::Written { path, rows }, Some(events)) = (&outcome, &self.events) {
            let _ = events.send(DownloadEvent::Exported {
                path: path.clone(),
                rows: *rows,
            });
        }

        Ok(outcome)
    }

    fn keywords(&self) -> &str {
        self.config.keywords()
    }

    fn city(&self) -> &str {
        self.config.city()
    }
}
