pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::discord::DiscordClient;
pub use config::{calendar::CalendarConfig, SyncConfig};
pub use crate::core::{
    calendar::translate, engine::SyncEngine, label::format_label, retry::RetryPolicy,
    sync::ChannelSynchronizer,
};
pub use domain::model::{CalendarSnapshot, RunReport, SyncOutcome};
pub use utils::error::{Result, SyncError};
