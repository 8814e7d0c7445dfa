pub mod client;
pub mod download;
pub mod etl;
pub mod export;
pub mod normalize;
pub mod pagination;
pub mod pipeline;

pub use crate::domain::model::{
    DownloadEvent, DownloadSummary, ExportOutcome, FetchReport, NormalizedPoiRecord,
    QueryRequest, RawPoiRecord, ResultPage, StopReason, PAGE_SIZE,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, PoiSource, Storage};
pub use crate::utils::error::Result;
