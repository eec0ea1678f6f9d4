use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;

use plummet::config::Config;
use plummet::logging;
use plummet::server;
use plummet::service::automation::WeeklyTrends;
use plummet::service::chat::SlackClient;
use plummet::service::market_data::AlphaVantageClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cfg = Config::from_env()?;
    logging::init(&cfg.log_level, cfg.log_pretty)?;
    info!(config = ?cfg, "configuration loaded");

    let market_data = Arc::new(AlphaVantageClient::with_base_url(
        &cfg.alpha_vantage_api_key,
        &cfg.alpha_vantage_url,
    )?);
    let notifier = Arc::new(SlackClient::with_api_url(
        &cfg.slack_token,
        &cfg.slack_api_url,
    )?);

    let job = Arc::new(WeeklyTrends::new(
        cfg.symbols.clone(),
        cfg.slack_channel.clone(),
        cfg.timezone,
        market_data,
        notifier,
    ));

    let listener = TcpListener::bind(("0.0.0.0", cfg.port)).await?;
    info!(addr = %listener.local_addr()?, symbols = job.symbols().len(), "started");

    server::serve(listener, server::router(job), server::shutdown_signal()).await?;

    info!("bye");
    Ok(())
}
