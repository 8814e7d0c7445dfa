pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, LocalStorage};

pub use self::core::{
    download::{download_pois, spawn_download, DownloadRequest},
    etl::EtlEngine,
    pipeline::PoiPipeline,
};
pub use domain::model::{DownloadEvent, DownloadSummary, NormalizedPoiRecord, RawPoiRecord};
pub use utils::error::{ErrorCategory, PoiError, Result};
