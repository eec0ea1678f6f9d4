use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{MarketData, MarketDataError};
use crate::models::{SeriesMetadata, TimeSeries, TimeSeriesRecord};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const FUNCTION: &str = "TIME_SERIES_DAILY_ADJUSTED";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Alpha Vantage client for the `TIME_SERIES_DAILY_ADJUSTED` endpoint.
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, MarketDataError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another endpoint, e.g. a local test server.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MarketData for AlphaVantageClient {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn fetch_daily_adjusted(&self, symbol: &str) -> Result<TimeSeries, MarketDataError> {
        debug!(symbol, "requesting daily adjusted series");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", FUNCTION),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status.as_u16() >= 400 {
            return Err(MarketDataError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let series = parse_daily_adjusted(&body)?;
        debug!(
            symbol,
            days = series.len(),
            last_refreshed = %series.metadata.last_refreshed,
            "parsed daily adjusted series"
        );
        Ok(series)
    }
}

// ── Alpha Vantage response types ────────────────────────────────────

#[derive(Deserialize)]
struct DailyAdjustedResponse {
    #[serde(rename = "Meta Data")]
    metadata: Option<RawMetadata>,
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, RawRecord>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(rename = "1. Information", default)]
    information: String,
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "4. Output Size")]
    output_size: Option<String>,
    #[serde(rename = "5. Time Zone")]
    time_zone: String,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. adjusted close")]
    adjusted_close: String,
    #[serde(rename = "6. volume")]
    volume: String,
    #[serde(rename = "7. dividend amount")]
    dividend_amount: String,
    #[serde(rename = "8. split coefficient")]
    split_coefficient: String,
}

/// Parse a `TIME_SERIES_DAILY_ADJUSTED` body into a [`TimeSeries`].
pub fn parse_daily_adjusted(body: &str) -> Result<TimeSeries, MarketDataError> {
    let resp: DailyAdjustedResponse = serde_json::from_str(body)
        .map_err(|e| MarketDataError::Parse(format!("invalid JSON: {e}")))?;

    // Alpha Vantage reports bad symbols and rate limits with a 200 and a message.
    let notice = resp
        .error_message
        .or(resp.note)
        .or(resp.information);

    let (metadata, raw_series) = match (resp.metadata, resp.time_series) {
        (Some(m), Some(ts)) => (m, ts),
        (m, _) => {
            let missing = if m.is_none() {
                "\"Meta Data\""
            } else {
                "\"Time Series (Daily)\""
            };
            return Err(MarketDataError::Parse(match notice {
                Some(msg) => format!("missing {missing}; provider said: {msg}"),
                None => format!("missing {missing}"),
            }));
        }
    };

    let mut records = HashMap::with_capacity(raw_series.len());
    for (key, raw) in raw_series {
        let date = NaiveDate::parse_from_str(&key, DATE_FORMAT)
            .map_err(|e| MarketDataError::Parse(format!("invalid date key {key:?}: {e}")))?;
        records.insert(date, parse_record(date, &raw));
    }

    Ok(TimeSeries::new(
        SeriesMetadata {
            information: metadata.information,
            symbol: metadata.symbol,
            last_refreshed: metadata.last_refreshed,
            output_size: metadata.output_size,
            time_zone: metadata.time_zone,
        },
        records,
    ))
}

// Malformed values become `None`; only a lookup that needs one fails.
fn parse_record(date: NaiveDate, raw: &RawRecord) -> TimeSeriesRecord {
    TimeSeriesRecord {
        open: parse_decimal(date, "open", &raw.open),
        high: parse_decimal(date, "high", &raw.high),
        low: parse_decimal(date, "low", &raw.low),
        close: parse_decimal(date, "close", &raw.close),
        adjusted_close: parse_decimal(date, "adjusted close", &raw.adjusted_close),
        volume: raw.volume.trim().parse().ok().or_else(|| {
            malformed(date, "volume", &raw.volume);
            None
        }),
        dividend_amount: parse_decimal(date, "dividend amount", &raw.dividend_amount),
        split_coefficient: parse_decimal(date, "split coefficient", &raw.split_coefficient),
    }
}

fn parse_decimal(date: NaiveDate, field: &'static str, raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    if value.is_none() {
        malformed(date, field, raw);
    }
    value
}

fn malformed(date: NaiveDate, field: &'static str, raw: &str) {
    warn!(%date, field, value = raw, "ignoring malformed numeric field");
}
