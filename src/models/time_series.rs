use std::collections::HashMap;

use chrono::NaiveDate;

/// One trading day of a daily adjusted series.
///
/// A field the provider sent in a form that does not parse is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRecord {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adjusted_close: Option<f64>,
    pub volume: Option<u64>,
    pub dividend_amount: Option<f64>,
    pub split_coefficient: Option<f64>,
}

/// Provider metadata returned alongside a series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesMetadata {
    pub information: String,
    pub symbol: String,
    pub last_refreshed: String,
    pub output_size: Option<String>,
    pub time_zone: String,
}

/// Daily adjusted series for a single symbol, keyed by trading date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub metadata: SeriesMetadata,
    pub records: HashMap<NaiveDate, TimeSeriesRecord>,
}

impl TimeSeries {
    pub fn new(metadata: SeriesMetadata, records: HashMap<NaiveDate, TimeSeriesRecord>) -> Self {
        Self { metadata, records }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&TimeSeriesRecord> {
        self.records.get(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.records.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
