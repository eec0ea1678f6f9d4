pub mod weekly_trends;

pub use weekly_trends::{JobError, JobPhase, WeeklyTrends};
