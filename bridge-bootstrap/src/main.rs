use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use bridge_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "onlycat2mqtt")]
#[command(about = "OnlyCat gateway to MQTT bridge", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("ONLYCAT_CONFIG", config);
    }

    let config = AppConfig::load().await?;
    let (level, log_dir) = log_settings(&config);

    // RUST_LOG still wins over the configured level when both are set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::daily(log_dir, "onlycat2mqtt.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    bridge_bootstrap::run(config).await
}

/// Effective log level and directory. Config load already absorbs the
/// `LOG_LEVEL` and `ONLYCAT_LOG_DIR` environment overrides, so these come
/// out of the config rather than the environment.
fn log_settings(config: &AppConfig) -> (String, String) {
    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let dir = config.log_dir.clone().unwrap_or_else(|| "./log".to_string());
    (level, dir)
}
