#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use plummet::models::{ReportSection, SeriesMetadata, TimeSeries, TimeSeriesRecord};
use plummet::service::chat::{Notifier, NotifyError};
use plummet::service::market_data::{MarketData, MarketDataError};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Alpha Vantage style `TIME_SERIES_DAILY_ADJUSTED` body.
pub fn daily_adjusted_json(symbol: &str, closes: &[(NaiveDate, f64)]) -> Value {
    let last = closes
        .iter()
        .map(|(d, _)| *d)
        .max()
        .map(|d| d.to_string())
        .unwrap_or_default();

    let series: serde_json::Map<String, Value> = closes
        .iter()
        .map(|(date, close)| {
            (
                date.to_string(),
                json!({
                    "1. open": format!("{close:.4}"),
                    "2. high": format!("{:.4}", close + 1.0),
                    "3. low": format!("{:.4}", close - 1.0),
                    "4. close": format!("{close:.4}"),
                    "5. adjusted close": format!("{close:.4}"),
                    "6. volume": "1000000",
                    "7. dividend amount": "0.0000",
                    "8. split coefficient": "1.0"
                }),
            )
        })
        .collect();

    json!({
        "Meta Data": {
            "1. Information": "Daily Time Series with Splits and Dividend Events",
            "2. Symbol": symbol,
            "3. Last Refreshed": last,
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern"
        },
        "Time Series (Daily)": series
    })
}

pub fn series(symbol: &str, closes: &[(NaiveDate, f64)]) -> TimeSeries {
    let records = closes
        .iter()
        .map(|&(date, close)| {
            (
                date,
                TimeSeriesRecord {
                    open: Some(close),
                    high: Some(close),
                    low: Some(close),
                    close: Some(close),
                    adjusted_close: Some(close),
                    volume: Some(1_000_000),
                    dividend_amount: Some(0.0),
                    split_coefficient: Some(1.0),
                },
            )
        })
        .collect();

    TimeSeries::new(
        SeriesMetadata {
            symbol: symbol.to_string(),
            ..Default::default()
        },
        records,
    )
}

/// Closes for the eight days ending at `anchor`, oldest at `base`.
pub fn week_ending(anchor: NaiveDate, base: f64, last: f64) -> Vec<(NaiveDate, f64)> {
    let mut closes: Vec<_> = (1..=6)
        .map(|offset| (anchor - Duration::days(offset), base + offset as f64))
        .collect();
    closes.push((anchor - Duration::days(7), base));
    closes.push((anchor, last));
    closes
}

pub enum FakeReply {
    Series(TimeSeries),
    Status(u16),
}

/// In-memory market data keyed by symbol. Records every request.
#[derive(Default)]
pub struct FakeMarketData {
    replies: HashMap<String, FakeReply>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMarketData {
    pub fn with(mut self, symbol: &str, reply: FakeReply) -> Self {
        self.replies.insert(symbol.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketData for FakeMarketData {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_daily_adjusted(&self, symbol: &str) -> Result<TimeSeries, MarketDataError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        match self.replies.get(symbol) {
            Some(FakeReply::Series(series)) => Ok(series.clone()),
            Some(FakeReply::Status(status)) => Err(MarketDataError::Provider {
                status: *status,
                body: "{\"message\":\"denied\"}".to_string(),
            }),
            None => Err(MarketDataError::Parse(format!("no fake data for {symbol}"))),
        }
    }
}

pub struct PostedReport {
    pub channel: String,
    pub date: NaiveDate,
    pub sections: Vec<ReportSection>,
}

/// Notifier that keeps every report, optionally rejecting with an error code.
#[derive(Default)]
pub struct RecordingNotifier {
    pub reject_with: Option<String>,
    pub posted: Mutex<Vec<PostedReport>>,
}

impl RecordingNotifier {
    pub fn rejecting(error: &str) -> Self {
        Self {
            reject_with: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.posted.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post_report(
        &self,
        channel: &str,
        report_date: NaiveDate,
        sections: &[ReportSection],
    ) -> Result<(), NotifyError> {
        if let Some(error) = &self.reject_with {
            return Err(NotifyError::Delivery(error.clone()));
        }
        self.posted.lock().unwrap().push(PostedReport {
            channel: channel.to_string(),
            date: report_date,
            sections: sections.to_vec(),
        });
        Ok(())
    }
}
