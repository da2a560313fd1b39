use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote channel whose display name carries the calendar label.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// `Ok(None)` when the resource exists but has no name.
    async fn fetch_channel_name(&self) -> Result<Option<String>>;
    /// Must be safe to repeat with the same name.
    async fn rename_channel(&self, new_name: &str) -> Result<()>;
}
