use crate::core::retry::{self, RetryPolicy};
use crate::domain::model::SyncOutcome;
use crate::domain::ports::ChannelApi;
use crate::utils::error::{Result, SyncError};

pub struct ChannelSynchronizer<A: ChannelApi> {
    api: A,
    retry: RetryPolicy,
    dry_run: bool,
}

impl<A: ChannelApi> ChannelSynchronizer<A> {
    pub fn new(api: A, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            dry_run: false,
        }
    }

    /// Fetch but never write.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 讀取遠端頻道名稱，只有與 `label` 不同時才改名
    pub async fn sync(&self, label: &str) -> Result<SyncOutcome> {
        let api = &self.api;

        let current = retry::with_backoff(
            &self.retry,
            "GET channel",
            SyncError::is_transient_block,
            move || api.fetch_channel_name(),
        )
        .await
        .map_err(SyncError::on_read)?;

        tracing::info!("Current channel name: {:?}", current);

        if current.as_deref() == Some(label) {
            tracing::info!("Channel name already up to date; nothing to do.");
            return Ok(SyncOutcome::Unchanged);
        }

        if self.dry_run {
            tracing::info!("🔍 DRY RUN - would rename channel to {:?}", label);
            return Ok(SyncOutcome::DryRun {
                from: current,
                to: label.to_string(),
            });
        }

        tracing::info!("Attempting to update channel name...");
        retry::with_backoff(
            &self.retry,
            "PATCH channel",
            SyncError::is_transient_block,
            move || api.rename_channel(label),
        )
        .await
        .map_err(SyncError::on_write)?;

        tracing::info!("✅ Channel successfully updated.");
        Ok(SyncOutcome::Renamed {
            from: current,
            to: label.to_string(),
        })
    }
}
