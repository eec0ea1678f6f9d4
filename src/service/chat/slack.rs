use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Notifier, NotifyError};
use crate::models::ReportSection;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";
pub const USERNAME: &str = "Weekly Trends";
pub const ICON_EMOJI: &str = ":chart_with_upwards_trend:";

/// Slack Web API client limited to `chat.postMessage`.
pub struct SlackClient {
    client: Client,
    token: String,
    api_url: String,
}

impl SlackClient {
    pub fn with_api_url(
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            api_url: api_url.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), method)
    }

    pub async fn chat_post_message(&self, req: &ChatPostMessage) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(NotifyError::Delivery(format!(
                "chat.postMessage returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let reply: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            NotifyError::Delivery(format!("unexpected chat.postMessage reply: {e}"))
        })?;

        if !reply.ok {
            return Err(NotifyError::Delivery(
                reply.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackClient {
    async fn post_report(
        &self,
        channel: &str,
        report_date: NaiveDate,
        sections: &[ReportSection],
    ) -> Result<(), NotifyError> {
        let req = ChatPostMessage::report(channel, report_date, sections);
        debug!(channel, attachments = req.attachments.len(), "posting report");
        self.chat_post_message(&req).await?;
        info!(channel, "report posted");
        Ok(())
    }
}

// ── chat.postMessage payload ────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChatPostMessage {
    pub channel: String,
    pub icon_emoji: String,
    pub username: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ChatPostMessage {
    /// The weekly trends message, one attachment per section.
    pub fn report(channel: &str, report_date: NaiveDate, sections: &[ReportSection]) -> Self {
        Self {
            channel: channel.to_string(),
            icon_emoji: ICON_EMOJI.to_string(),
            username: USERNAME.to_string(),
            text: format!("Weekly trends for {}", report_date.format("%Y-%m-%d")),
            attachments: sections.iter().map(Attachment::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub title: String,
    pub title_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl From<&ReportSection> for Attachment {
    fn from(section: &ReportSection) -> Self {
        Self {
            color: section.severity.map(|s| s.as_str().to_string()),
            title: section.title.clone(),
            title_link: section.title_link.clone(),
            text: section.text.clone().filter(|t| !t.is_empty()),
            fields: section
                .lines
                .iter()
                .map(|line| AttachmentField {
                    title: line.label.clone(),
                    value: line.value.clone(),
                    short: true,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}
