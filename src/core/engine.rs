use crate::config::calendar::{validate_instant, CalendarConfig};
use crate::core::calendar::translate;
use crate::core::label::format_label;
use crate::core::sync::ChannelSynchronizer;
use crate::domain::model::RunReport;
use crate::domain::ports::ChannelApi;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};

/// One run: translate once, format once, synchronise once.
pub struct SyncEngine<A: ChannelApi> {
    calendar: CalendarConfig,
    icon: String,
    synchronizer: ChannelSynchronizer<A>,
}

impl<A: ChannelApi> SyncEngine<A> {
    pub fn new(calendar: CalendarConfig, icon: String, synchronizer: ChannelSynchronizer<A>) -> Self {
        Self {
            calendar,
            icon,
            synchronizer,
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        self.run_at(Utc::now().timestamp_millis()).await
    }

    /// Rejects instants chrono cannot represent before anything is fetched.
    pub async fn run_at(&self, now_ms: i64) -> Result<RunReport> {
        validate_instant("now", now_ms)?;
        let snapshot = translate(&self.calendar, now_ms);
        let label = format_label(&snapshot, &self.icon);

        tracing::info!("Computed channel name: {}", label);
        tracing::debug!(
            "Month {} of {} is {} into a {} month; next month at {}, next year at {}",
            snapshot.month,
            snapshot.year,
            describe_duration(snapshot.elapsed_into_month_ms),
            describe_duration(snapshot.month_duration_ms),
            describe_instant(snapshot.next_month_boundary_ms),
            describe_instant(snapshot.next_year_boundary_ms),
        );

        let outcome = self.synchronizer.sync(&label).await?;

        Ok(RunReport {
            snapshot,
            label,
            outcome,
        })
    }
}

/// RFC 3339 in UTC, or the raw millisecond value when out of chrono's range.
pub fn describe_instant(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{}ms", ms))
}

pub fn describe_duration(ms: i64) -> String {
    let d = Duration::milliseconds(ms);
    format!(
        "{}h{:02}m{:02}s",
        d.num_hours(),
        d.num_minutes() % 60,
        d.num_seconds() % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::RetryPolicy;
    use crate::domain::model::SyncOutcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct FixedChannel {
        name: String,
        writes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ChannelApi for FixedChannel {
        async fn fetch_channel_name(&self) -> Result<Option<String>> {
            Ok(Some(self.name.clone()))
        }

        async fn rename_channel(&self, _new_name: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn engine(remote_name: &str) -> (SyncEngine<FixedChannel>, Arc<AtomicUsize>) {
        let writes = Arc::new(AtomicUsize::new(0));
        let channel = FixedChannel {
            name: remote_name.to_string(),
            writes: writes.clone(),
        };
        let synchronizer = ChannelSynchronizer::new(channel, RetryPolicy::none());
        (
            SyncEngine::new(CalendarConfig::default(), "📅".to_string(), synchronizer),
            writes,
        )
    }

    #[tokio::test]
    async fn test_run_at_anchor_produces_january_1829() {
        let (engine, writes) = engine("📅 January 1829");

        let report = engine.run_at(1_757_721_600_000).await.unwrap();

        assert_eq!(report.label, "📅 January 1829");
        assert_eq!(report.outcome, SyncOutcome::Unchanged);
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_at_writes_new_month() {
        let (engine, writes) = engine("📅 January 1829");

        // 一個月 = 14 小時
        let report = engine.run_at(1_757_721_600_000 + 50_400_000).await.unwrap();

        assert_eq!(report.label, "📅 February 1829");
        assert!(report.outcome.wrote());
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    /// 任何遠端呼叫都視為測試失敗
    struct UnreachableChannel;

    #[async_trait]
    impl ChannelApi for UnreachableChannel {
        async fn fetch_channel_name(&self) -> Result<Option<String>> {
            panic!("channel must not be fetched");
        }

        async fn rename_channel(&self, _new_name: &str) -> Result<()> {
            panic!("channel must not be renamed");
        }
    }

    #[tokio::test]
    async fn test_run_at_rejects_unrepresentable_instant() {
        let synchronizer = ChannelSynchronizer::new(UnreachableChannel, RetryPolicy::none());
        let engine = SyncEngine::new(CalendarConfig::default(), "📅".to_string(), synchronizer);

        for at in [i64::MIN, i64::MAX] {
            let err = engine.run_at(at).await.unwrap_err();
            assert!(matches!(
                err,
                crate::utils::error::SyncError::InvalidConfigValueError { ref field, .. } if field == "now"
            ));
            assert_eq!(err.exit_code(), 3);
        }
    }

    #[test]
    fn test_describe_helpers() {
        assert_eq!(describe_instant(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(describe_instant(i64::MAX), format!("{}ms", i64::MAX));
        assert_eq!(describe_duration(50_400_000), "14h00m00s");
        assert_eq!(describe_duration(3_723_000), "1h02m03s");
    }
}
