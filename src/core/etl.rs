use crate::core::{DownloadSummary, ExportOutcome, FetchReport, Pipeline, StopReason};
use crate::utils::error::{PoiError, Result};
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<DownloadSummary> {
        let started = Instant::now();

        // 先確認輸出位置，失敗時不發出任何請求
        self.pipeline.preflight().await?;

        let FetchReport {
            records,
            pages_requested,
            stop,
        } = self.pipeline.extract().await?;

        if records.is_empty() {
            return Err(self.empty_result_error(pages_requested, stop));
        }

        if !stop.is_exhausted() {
            tracing::warn!(
                "⚠️ Pagination ended early on page {} ({}); exporting {} partial records",
                pages_requested,
                stop,
                records.len()
            );
        }

        let normalized = self.pipeline.transform(records).await?;
        tracing::info!("🔧 Normalized {} records", normalized.len());

        match self.pipeline.load(normalized).await? {
            ExportOutcome::Written { path, rows } => {
                tracing::info!(
                    "✅ Wrote {} rows to {} in {:?}",
                    rows,
                    path,
                    started.elapsed()
                );
                Ok(DownloadSummary {
                    records_written: rows,
                    output_path: path,
                    pages_requested,
                    stop,
                })
            }
            ExportOutcome::NothingToExport => Err(self.no_data()),
        }
    }

    /// Zero records: surface why, instead of a bare "no data".
    fn empty_result_error(&self, pages_requested: u32, stop: StopReason) -> PoiError {
        match stop {
            StopReason::TransportFailed { message } => PoiError::TransportFailure {
                page: pages_requested,
                message,
            },
            StopReason::Rejected { status, info } => PoiError::UpstreamRejected {
                status: status.unwrap_or_else(|| "missing".to_string()),
                info: info.unwrap_or_default(),
            },
            _ => self.no_data(),
        }
    }

    fn no_data(&self) -> PoiError {
        PoiError::NoData {
            keywords: self.pipeline.keywords().to_string(),
            city: self.pipeline.city().to_string(),
        }
    }
}
