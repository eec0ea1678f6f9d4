pub mod report;
pub mod time_series;

pub use report::{ComparisonLine, Direction, ReportSection, Severity, Ticker};
pub use time_series::{SeriesMetadata, TimeSeries, TimeSeriesRecord};
