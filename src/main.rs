use clap::Parser;
use poi_fetch::core::ConfigProvider;
use poi_fetch::utils::{logger, validation::Validate};
use poi_fetch::{spawn_download, CliConfig, DownloadEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting poi-fetch");
    tracing::debug!(
        "Query: keywords={} city={} output_dir={} endpoint={}",
        config.keywords(),
        config.city(),
        config.output_dir(),
        config.endpoint()
    );

    // 驗證配置，在任何網路請求之前
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let (handle, mut events) = spawn_download(config);

    while let Some(event) = events.recv().await {
        match event {
            DownloadEvent::PageFetched {
                page,
                returned,
                accumulated,
            } => println!("📄 第 {} 頁: {} 筆 (累計 {})", page, returned, accumulated),
            DownloadEvent::FetchStopped { pages, reason } => {
                tracing::debug!("Fetch stopped after {} pages: {}", pages, reason)
            }
            DownloadEvent::Exported { path, rows } => {
                tracing::debug!("Exported {} rows to {}", rows, path)
            }
        }
    }

    match handle.await? {
        Ok(summary) => {
            println!("✅ 下載完成！共獲取到 {} 條數據", summary.records_written);
            println!("📁 數據已保存到: {}", summary.output_path);
            if !summary.stop.is_exhausted() {
                println!("⚠️ 結果可能不完整: {}", summary.stop);
            }
        }
        Err(e) => {
            tracing::error!("❌ Download failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
