//! Dvmn review notification bot binary entrypoint.

use tracing_subscriber::EnvFilter;

use dvmn_bot::app;
use dvmn_common::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Read `.env` before the filter so RUST_LOG can live there too
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("dvmn_bot=info,dvmn_engine=info,dvmn_poller=info,dvmn_notifier=info")
        }))
        .init();

    tracing::info!("Dvmn notification bot starting...");

    let config = AppConfig::from_env()?;
    let supervisor = app::build(&config)?;

    tracing::info!(
        endpoint = %config.devman_api_url,
        chat_id = %config.chat_id,
        reporting = config.reporter.is_some(),
        "Relaying review results"
    );

    tokio::select! {
        _ = supervisor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping...");
        }
    }

    tracing::info!("Dvmn notification bot stopped.");
    Ok(())
}
