use crate::config::DiscordSettings;
use crate::domain::model::ChannelInfo;
use crate::domain::ports::ChannelApi;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/rp-calendar-sync, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// `ChannelApi` over the Discord REST API.
pub struct DiscordClient {
    client: Client,
    channel_url: String,
    token: String,
    block_marker: String,
}

impl DiscordClient {
    pub fn new(settings: &DiscordSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            channel_url: format!(
                "{}/channels/{}",
                settings.api_base.trim_end_matches('/'),
                settings.channel_id
            ),
            token: settings.token.clone(),
            block_marker: settings.block_marker.clone(),
        })
    }

    pub fn channel_url(&self) -> &str {
        &self.channel_url
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// 4xx 且回應內容帶有封鎖標記時視為可重試
    fn classify_failure(
        &self,
        status: StatusCode,
        body: String,
        permanent: fn(u16, String) -> SyncError,
    ) -> SyncError {
        let status = status.as_u16();
        if (400..500).contains(&status) && !self.block_marker.is_empty() && body.contains(&self.block_marker) {
            SyncError::TransientBlock { status, body }
        } else {
            permanent(status, body)
        }
    }
}

#[async_trait]
impl ChannelApi for DiscordClient {
    async fn fetch_channel_name(&self) -> Result<Option<String>> {
        tracing::debug!("Making API request to: GET {}", self.channel_url);
        let response = self
            .client
            .get(&self.channel_url)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(self.classify_failure(status, body, |status, body| {
                SyncError::RemoteReadError { status, body }
            }));
        }

        let info: ChannelInfo = serde_json::from_str(&body)?;
        Ok(info.name)
    }

    async fn rename_channel(&self, new_name: &str) -> Result<()> {
        tracing::debug!("Making API request to: PATCH {}", self.channel_url);
        let response = self
            .client
            .patch(&self.channel_url)
            .header(AUTHORIZATION, self.auth_header())
            .json(&serde_json::json!({ "name": new_name }))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        Err(self.classify_failure(status, body, |status, body| {
            SyncError::RemoteWriteError { status, body }
        }))
    }
}
