use async_trait::async_trait;

use crate::models::TimeSeries;

pub mod alphavantage;

pub use alphavantage::AlphaVantageClient;

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    /// The request could not be sent or the body could not be read.
    #[error("market data request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("market data provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("unexpected market data response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key.
        MarketDataError::Transport(e.without_url())
    }
}

/// Source of daily adjusted price series.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Fetch the daily adjusted series for `symbol`. One attempt, no retries.
    async fn fetch_daily_adjusted(&self, symbol: &str) -> Result<TimeSeries, MarketDataError>;
}
