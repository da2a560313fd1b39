use serde::Deserialize;

/// 某一時刻對應的劇中曆法位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSnapshot {
    pub year: i64,
    /// 1..=12
    pub month: u32,
    pub total_months_elapsed: i64,
    pub elapsed_into_month_ms: i64,
    pub month_duration_ms: i64,
    pub next_month_boundary_ms: i64,
    pub next_year_boundary_ms: i64,
}

/// Subset of the channel resource returned by `GET /channels/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Renamed { from: Option<String>, to: String },
    DryRun { from: Option<String>, to: String },
}

impl SyncOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, SyncOutcome::Renamed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: CalendarSnapshot,
    pub label: String,
    pub outcome: SyncOutcome,
}
