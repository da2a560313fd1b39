use crate::config::calendar::{CalendarConfig, MONTHS_PER_YEAR};
use crate::domain::model::CalendarSnapshot;

/// 將真實時間換算成劇中年月
///
/// Floored division keeps instants before the anchor on a coherent
/// calendar: one month before the anchor is December of the previous year.
///
/// `now_ms` must lie in chrono's representable range (roughly ±262,000
/// years around the epoch, see [`validate_instant`]); outside it the
/// subtraction from the anchor can overflow. [`crate::SyncEngine::run_at`]
/// checks this before calling.
///
/// [`validate_instant`]: crate::config::calendar::validate_instant
pub fn translate(config: &CalendarConfig, now_ms: i64) -> CalendarSnapshot {
    let month_ms = config.month_duration_ms();
    let anchor = config.anchor_real_ms();

    let elapsed_ms = now_ms - anchor;
    let total_months = elapsed_ms.div_euclid(month_ms);
    let years_elapsed = total_months.div_euclid(MONTHS_PER_YEAR);
    let month_index = total_months.rem_euclid(MONTHS_PER_YEAR);

    let elapsed_into_month_ms = elapsed_ms - total_months * month_ms;
    let months_until_year_end = MONTHS_PER_YEAR - month_index;

    CalendarSnapshot {
        year: config.anchor_year() + years_elapsed,
        month: (month_index + 1) as u32,
        total_months_elapsed: total_months,
        elapsed_into_month_ms,
        month_duration_ms: month_ms,
        next_month_boundary_ms: anchor + (total_months + 1) * month_ms,
        next_year_boundary_ms: anchor + (total_months + months_until_year_end) * month_ms,
    }
}

/// The month in progress at `now_ms` followed by the next `count - 1` months.
pub fn upcoming(config: &CalendarConfig, now_ms: i64, count: usize) -> Vec<CalendarSnapshot> {
    let mut months = Vec::new();
    let mut at = now_ms;
    for _ in 0..count {
        let snapshot = translate(config, at);
        at = snapshot.next_month_boundary_ms;
        months.push(snapshot);
    }
    months
}
