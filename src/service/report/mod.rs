pub mod change;
pub mod section;

pub use change::{percent_change, Change, ChangeError};
pub use section::{build_section, MAX_OFFSET_DAYS, NO_DATA_TEXT};
