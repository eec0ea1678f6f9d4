use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::ReportSection;

pub mod slack;

pub use slack::SlackClient;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("chat request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// Non-2xx status, unreadable reply, or `ok: false` from the chat API.
    #[error("chat delivery failed: {0}")]
    Delivery(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e.without_url())
    }
}

/// Delivers a finished report to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post every section as one message. Nothing is sent partially.
    async fn post_report(
        &self,
        channel: &str,
        report_date: NaiveDate,
        sections: &[ReportSection],
    ) -> Result<(), NotifyError>;
}
