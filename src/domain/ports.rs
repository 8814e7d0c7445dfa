use crate::domain::model::{
    ExportOutcome, FetchReport, NormalizedPoiRecord, QueryRequest, RawPoiRecord, ResultPage,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Fails if the storage cannot accept writes.
    fn ensure_ready(&self) -> Result<()>;

    /// Display form of where `path` ends up.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn keywords(&self) -> &str;
    fn city(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn endpoint(&self) -> &str;
    fn page_delay(&self) -> Duration;
    /// `None` means pages are requested until upstream runs out.
    fn max_pages(&self) -> Option<u32>;

    fn output_file_name(&self) -> String {
        crate::core::export::output_file_name(self.city(), self.keywords())
    }
}

/// One page of search results per call.
#[async_trait]
pub trait PoiSource: Send + Sync {
    async fn search(&self, request: &QueryRequest) -> Result<ResultPage>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Checks that must pass before any network request is made.
    async fn preflight(&self) -> Result<()> {
        Ok(())
    }
    async fn extract(&self) -> Result<FetchReport>;
    async fn transform(&self, data: Vec<RawPoiRecord>) -> Result<Vec<NormalizedPoiRecord>>;
    async fn load(&self, records: Vec<NormalizedPoiRecord>) -> Result<ExportOutcome>;
    fn keywords(&self) -> &str;
    fn city(&self) -> &str;
}
