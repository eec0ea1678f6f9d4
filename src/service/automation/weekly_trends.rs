use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn};

use crate::models::{ReportSection, Ticker};
use crate::service::chat::{Notifier, NotifyError};
use crate::service::market_data::{MarketData, MarketDataError};
use crate::service::report::{build_section, ChangeError};

/// Where a report run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Getting series from the market data provider.
    Fetching,
    /// Building sections or posting the message.
    Reporting,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("failed to get time series of {symbol}: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: MarketDataError,
    },
    #[error("failed to build report section for {symbol}: {source}")]
    Section {
        symbol: String,
        #[source]
        source: ChangeError,
    },
    #[error("failed to post report: {0}")]
    Deliver(#[from] NotifyError),
}

impl JobError {
    /// The phase the run was in when it failed.
    pub fn phase(&self) -> JobPhase {
        match self {
            JobError::Fetch { .. } => JobPhase::Fetching,
            JobError::Section { .. } | JobError::Deliver(_) => JobPhase::Reporting,
        }
    }
}

/// The weekly trends report: fetch every ticker, build sections, post once.
pub struct WeeklyTrends {
    symbols: Vec<Ticker>,
    channel: String,
    timezone: Tz,
    market_data: Arc<dyn MarketData>,
    notifier: Arc<dyn Notifier>,
}

impl WeeklyTrends {
    pub fn new(
        symbols: Vec<Ticker>,
        channel: impl Into<String>,
        timezone: Tz,
        market_data: Arc<dyn MarketData>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            symbols,
            channel: channel.into(),
            timezone,
            market_data,
            notifier,
        }
    }

    pub fn symbols(&self) -> &[Ticker] {
        &self.symbols
    }

    /// Today in the market timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Run the report for `anchor`. Returns the number of sections posted.
    ///
    /// Tickers are fetched one after another; the first fetch failure aborts
    /// the run before anything is posted.
    #[instrument(skip(self), fields(channel = %self.channel))]
    pub async fn run(&self, anchor: NaiveDate) -> Result<usize, JobError> {
        debug!(
            symbols = self.symbols.len(),
            provider = self.market_data.name(),
            "starting report"
        );
        let mut sections = Vec::with_capacity(self.symbols.len());
        for ticker in &self.symbols {
            sections.push(self.section_for(ticker, anchor).await?);
        }

        debug!(sections = sections.len(), "posting report");
        self.notifier
            .post_report(&self.channel, anchor, &sections)
            .await?;

        info!(sections = sections.len(), "report delivered");
        Ok(sections.len())
    }

    async fn section_for(
        &self,
        ticker: &Ticker,
        anchor: NaiveDate,
    ) -> Result<ReportSection, JobError> {
        let series = self
            .market_data
            .fetch_daily_adjusted(&ticker.symbol)
            .await
            .map_err(|source| JobError::Fetch {
                symbol: ticker.symbol.clone(),
                source,
            })?;

        if series.metadata.symbol.to_uppercase() != ticker.symbol {
            warn!(
                requested = %ticker.symbol,
                returned = %series.metadata.symbol,
                "provider returned a different symbol"
            );
        }

        let section = build_section(ticker, &series, anchor).map_err(|source| {
            JobError::Section {
                symbol: ticker.symbol.clone(),
                source,
            }
        })?;

        debug!(symbol = %ticker.symbol, lines = section.lines.len(), "section built");
        Ok(section)
    }
}
