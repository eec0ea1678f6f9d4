use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::{Direction, TimeSeries};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChangeError {
    /// Non-trading day or not yet published. Callers skip the comparison.
    #[error("{0} doesn't exist in the series")]
    DateNotFound(NaiveDate),
    #[error("adjusted close on {date} is unusable: {reason}")]
    NumericParse { date: NaiveDate, reason: String },
}

/// Adjusted-close comparison between an anchor date and an earlier date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    pub anchor_close: f64,
    pub compare_close: f64,
    /// Percentage change from `compare_close` to `anchor_close`.
    pub rate: f64,
    pub direction: Direction,
}

/// Compare the adjusted closes of `anchor` and `compare`.
///
/// A zero compare close is rejected instead of yielding an infinite rate.
pub fn percent_change(
    series: &TimeSeries,
    anchor: NaiveDate,
    compare: NaiveDate,
) -> Result<Change, ChangeError> {
    let anchor_close = adjusted_close(series, anchor)?;
    let compare_close = adjusted_close(series, compare)?;

    if compare_close == 0.0 {
        return Err(ChangeError::NumericParse {
            date: compare,
            reason: "zero close cannot be used as a base".to_string(),
        });
    }

    let rate = (anchor_close - compare_close) / compare_close * 100.0;
    let direction = match anchor_close.partial_cmp(&compare_close) {
        Some(Ordering::Greater) => Direction::Up,
        Some(Ordering::Less) => Direction::Down,
        _ => Direction::Flat,
    };

    Ok(Change {
        anchor_close,
        compare_close,
        rate,
        direction,
    })
}

fn adjusted_close(series: &TimeSeries, date: NaiveDate) -> Result<f64, ChangeError> {
    let record = series.get(date).ok_or(ChangeError::DateNotFound(date))?;
    record
        .adjusted_close
        .ok_or_else(|| ChangeError::NumericParse {
            date,
            reason: "provider sent a malformed value".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::report::test_support::{day, series};

    #[test]
    fn matches_direct_computation() {
        let ts = series(&[((2024, 1, 10), 100.0), ((2024, 1, 3), 95.0)]);
        let change = percent_change(&ts, day(2024, 1, 10), day(2024, 1, 3)).unwrap();

        assert_eq!(change.anchor_close, 100.0);
        assert_eq!(change.compare_close, 95.0);
        assert_eq!(change.rate, (100.0 - 95.0) / 95.0 * 100.0);
        assert_eq!(format!("{:.2}", change.rate), "5.26");
        assert_eq!(change.direction, Direction::Up);
    }

    #[test]
    fn direction_is_three_way() {
        let ts = series(&[
            ((2024, 1, 10), 100.0),
            ((2024, 1, 9), 100.0),
            ((2024, 1, 8), 100.5),
        ]);
        let flat = percent_change(&ts, day(2024, 1, 10), day(2024, 1, 9)).unwrap();
        assert_eq!(flat.direction, Direction::Flat);
        assert_eq!(flat.rate, 0.0);

        let down = percent_change(&ts, day(2024, 1, 10), day(2024, 1, 8)).unwrap();
        assert_eq!(down.direction, Direction::Down);
        assert!(down.rate < 0.0);
    }

    #[test]
    fn missing_dates_are_named() {
        let ts = series(&[((2024, 1, 10), 100.0)]);
        assert_eq!(
            percent_change(&ts, day(2024, 1, 10), day(2024, 1, 6)),
            Err(ChangeError::DateNotFound(day(2024, 1, 6)))
        );
        assert_eq!(
            percent_change(&ts, day(2024, 1, 11), day(2024, 1, 10)),
            Err(ChangeError::DateNotFound(day(2024, 1, 11)))
        );
    }

    #[test]
    fn zero_base_is_rejected() {
        let ts = series(&[((2024, 1, 10), 100.0), ((2024, 1, 9), 0.0)]);
        match percent_change(&ts, day(2024, 1, 10), day(2024, 1, 9)) {
            Err(ChangeError::NumericParse { date, .. }) => assert_eq!(date, day(2024, 1, 9)),
            other => panic!("expected numeric error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_close_is_rejected_only_when_looked_up() {
        let mut ts = series(&[
            ((2024, 1, 10), 100.0),
            ((2024, 1, 9), 99.0),
            ((2024, 1, 8), 98.0),
        ]);
        if let Some(record) = ts.records.get_mut(&day(2024, 1, 8)) {
            record.adjusted_close = None;
        }

        assert!(percent_change(&ts, day(2024, 1, 10), day(2024, 1, 9)).is_ok());
        assert_eq!(
            percent_change(&ts, day(2024, 1, 10), day(2024, 1, 8)),
            Err(ChangeError::NumericParse {
                date: day(2024, 1, 8),
                reason: "provider sent a malformed value".to_string(),
            })
        );
    }
}
