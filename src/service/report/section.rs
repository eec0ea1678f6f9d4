use chrono::{Duration, NaiveDate};
use tracing::warn;

use super::change::{percent_change, ChangeError};
use crate::models::{ComparisonLine, ReportSection, Severity, Ticker, TimeSeries};

/// Days back from the anchor that get a comparison line.
pub const MAX_OFFSET_DAYS: u32 = 7;
pub const NO_DATA_TEXT: &str = "no data";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the report section for one ticker.
///
/// Offsets whose dates are missing from the series are skipped. If the anchor
/// itself is missing the section carries [`NO_DATA_TEXT`] and no lines.
pub fn build_section(
    ticker: &Ticker,
    series: &TimeSeries,
    anchor: NaiveDate,
) -> Result<ReportSection, ChangeError> {
    let mut section = ReportSection {
        title: ticker.symbol.clone(),
        title_link: ticker.quote_url(),
        severity: None,
        text: None,
        lines: Vec::new(),
    };

    if !series.contains(anchor) {
        warn!(symbol = %ticker.symbol, %anchor, "no data for anchor date");
        section.text = Some(NO_DATA_TEXT.to_string());
        return Ok(section);
    }

    for offset in 1..=MAX_OFFSET_DAYS {
        let compare = anchor - Duration::days(i64::from(offset));

        let change = match percent_change(series, anchor, compare) {
            Ok(change) => change,
            Err(err @ ChangeError::DateNotFound(_)) => {
                warn!(symbol = %ticker.symbol, offset, "{err}");
                continue;
            }
            Err(err) => return Err(err),
        };

        if offset == MAX_OFFSET_DAYS {
            section.severity = Severity::from_rate(change.rate);
        }

        section.lines.push(ComparisonLine {
            offset_days: offset,
            label: format!(
                "{} => {}",
                compare.format(DATE_FORMAT),
                anchor.format(DATE_FORMAT)
            ),
            value: format!(
                "{:4.2} => {:4.2} ({:.2}%)",
                change.compare_close, change.anchor_close, change.rate
            ),
            rate: change.rate,
            direction: change.direction,
        });
    }

    Ok(section)
}
