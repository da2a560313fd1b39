pub mod calendar;
pub mod engine;
pub mod label;
pub mod retry;
pub mod sync;

pub use crate::domain::model::{CalendarSnapshot, ChannelInfo, RunReport, SyncOutcome};
pub use crate::domain::ports::ChannelApi;
pub use crate::utils::error::Result;
