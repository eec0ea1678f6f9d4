use std::fmt;

const QUOTE_URL_BASE: &str = "https://google.com/finance/quote/";

/// A configured symbol entry, `SYMBOL` or `SYMBOL:MARKET` (e.g. `AAPL:NASDAQ`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    pub symbol: String,
    pub market: Option<String>,
}

impl Ticker {
    /// Parse a configured entry. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (symbol, market) = match raw.split_once(':') {
            Some((s, m)) => (s.trim(), Some(m.trim()).filter(|m| !m.is_empty())),
            None => (raw, None),
        };
        if symbol.is_empty() {
            return None;
        }

        Some(Self {
            symbol: symbol.to_uppercase(),
            market: market.map(str::to_uppercase),
        })
    }

    /// Google Finance quote page for this entry.
    pub fn quote_url(&self) -> String {
        format!("{QUOTE_URL_BASE}{self}")
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.market {
            Some(market) => write!(f, "{}:{}", self.symbol, market),
            None => f.write_str(&self.symbol),
        }
    }
}

/// Week-over-week severity shown as the attachment color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Good,
    Warning,
    Danger,
}

impl Severity {
    /// Classify a 7-day percentage rate. Flat and mild drops get no color.
    pub fn from_rate(rate: f64) -> Option<Self> {
        if rate > 0.0 {
            Some(Severity::Good)
        } else if rate <= -5.0 {
            Some(Severity::Danger)
        } else if rate <= -3.0 {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// One "N days back" comparison against the anchor date.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonLine {
    pub offset_days: u32,
    pub label: String,
    pub value: String,
    pub rate: f64,
    pub direction: Direction,
}

/// Rendered output for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub title_link: String,
    pub severity: Option<Severity>,
    pub text: Option<String>,
    pub lines: Vec<ComparisonLine>,
}
