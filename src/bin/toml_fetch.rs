use clap::Parser;
use poi_fetch::core::ConfigProvider;
use poi_fetch::utils::{logger, validation::Validate};
use poi_fetch::{download_pois, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-fetch")]
#[command(about = "POI download driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "poi-fetch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override `[fetch] max_pages` (0 = no limit)
    #[arg(long)]
    max_pages: Option<u32>,

    /// Show what would be requested without touching the network
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based POI download");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(max_pages) = args.max_pages {
        config
            .fetch
            .get_or_insert(poi_fetch::config::toml_config::FetchConfig {
                page_delay_ms: None,
                max_pages: None,
            })
            .max_pages = Some(max_pages);
        tracing::info!("🔧 max_pages overridden to: {}", max_pages);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, args.dry_run);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    match download_pois(config).await {
        Ok(summary) => {
            tracing::info!("✅ Download completed successfully!");
            println!(
                "✅ 下載完成！共獲取到 {} 條數據 ({} 頁)",
                summary.records_written, summary.pages_requested
            );
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

fn display_config_summary(config: &TomlConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", config.endpoint());
    println!("  Keywords: {}", config.keywords());
    println!("  City: {}", config.city());
    println!("  Page delay: {:?}", config.page_delay());
    match config.max_pages() {
        Some(max_pages) => println!("  Max pages: {}", max_pages),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Output: {}",
        std::path::Path::new(config.output_dir())
            .join(config.output_file_name())
            .display()
    );

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
