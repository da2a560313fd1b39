use crate::utils::error::{Result, SyncError};
use crate::utils::validation::validate_positive_real;
use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;
use url::Url;

/// 預設的 RP 時間換算器網址（錨點釘在 2025-09-13）
pub const DEFAULT_CALCULATOR_URL: &str = "https://compupro.github.io/rp-time-calculator/?daysperyear=7&lastdatechange=1757721600000&lastdateepoch=-4449513600000&fixedyears=true";

pub const MONTHS_PER_YEAR: i64 = 12;
const MS_PER_HOUR: f64 = 3_600_000.0;
const DEFAULT_DAYS_PER_YEAR: f64 = 7.0;

/// Linear mapping between real time and in-universe time.
///
/// Built only through [`CalendarConfig::new`], so a value of this type
/// always has a positive month duration and anchors chrono can represent.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    days_per_year: f64,
    anchor_real_ms: i64,
    anchor_in_universe_ms: i64,
    fixed_years: bool,
    month_duration_ms: i64,
    anchor_year: i64,
}

impl CalendarConfig {
    pub fn new(
        days_per_year: f64,
        anchor_real_ms: i64,
        anchor_in_universe_ms: i64,
        fixed_years: bool,
    ) -> Result<Self> {
        validate_positive_real("calendar.days_per_year", days_per_year)?;

        let hours_per_month = days_per_year * 24.0 / MONTHS_PER_YEAR as f64;
        let month_duration = (hours_per_month * MS_PER_HOUR).round();
        if month_duration < 1.0 {
            return Err(SyncError::InvalidConfigValueError {
                field: "calendar.days_per_year".to_string(),
                value: days_per_year.to_string(),
                reason: "Months would be shorter than one millisecond".to_string(),
            });
        }
        // chrono 的可表示範圍約為 ±262,000 年
        if month_duration > MS_PER_HOUR * 24.0 * 365.0 * 10_000.0 {
            return Err(SyncError::InvalidConfigValueError {
                field: "calendar.days_per_year".to_string(),
                value: days_per_year.to_string(),
                reason: "Months would be longer than ten thousand real years".to_string(),
            });
        }

        validate_instant("calendar.last_date_change", anchor_real_ms)?;
        let anchor_year = utc_instant("calendar.last_date_epoch", anchor_in_universe_ms)?.year() as i64;

        Ok(Self {
            days_per_year,
            anchor_real_ms,
            anchor_in_universe_ms,
            fixed_years,
            month_duration_ms: month_duration as i64,
            anchor_year,
        })
    }

    /// 解析 RP 時間換算器網址的查詢字串
    ///
    /// Recognised parameters: `daysperyear` (defaults to 7), `lastdatechange`
    /// and `lastdateepoch` (both required, milliseconds), `fixedyears`.
    pub fn from_calculator_url(url_str: &str) -> Result<Self> {
        let url = Url::parse(url_str).map_err(|e| SyncError::InvalidConfigValueError {
            field: "calendar.url".to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        let days_per_year = match query.get("daysperyear") {
            Some(raw) => parse_param::<f64>("daysperyear", raw)?,
            None => DEFAULT_DAYS_PER_YEAR,
        };
        let anchor_real_ms = parse_param::<i64>("lastdatechange", required(&query, "lastdatechange")?)?;
        let anchor_in_universe_ms =
            parse_param::<i64>("lastdateepoch", required(&query, "lastdateepoch")?)?;
        let fixed_years = query
            .get("fixedyears")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Self::new(days_per_year, anchor_real_ms, anchor_in_universe_ms, fixed_years)
    }

    pub fn days_per_year(&self) -> f64 {
        self.days_per_year
    }

    pub fn anchor_real_ms(&self) -> i64 {
        self.anchor_real_ms
    }

    pub fn anchor_in_universe_ms(&self) -> i64 {
        self.anchor_in_universe_ms
    }

    /// Carried from the calculator URL; the month arithmetic ignores it.
    pub fn fixed_years(&self) -> bool {
        self.fixed_years
    }

    pub fn month_duration_ms(&self) -> i64 {
        self.month_duration_ms
    }

    /// UTC calendar year of the in-universe anchor.
    pub fn anchor_year(&self) -> i64 {
        self.anchor_year
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            days_per_year: DEFAULT_DAYS_PER_YEAR,
            anchor_real_ms: 1_757_721_600_000,
            anchor_in_universe_ms: -4_449_513_600_000,
            fixed_years: true,
            month_duration_ms: 50_400_000,
            anchor_year: 1829,
        }
    }
}

/// 檢查時間戳是否落在 chrono 可表示的範圍內
///
/// Any instant accepted here keeps `now - anchor` and the month/year
/// boundary arithmetic in [`crate::core::calendar::translate`] within `i64`.
pub fn validate_instant(field: &str, ms: i64) -> Result<()> {
    utc_instant(field, ms).map(|_| ())
}

fn utc_instant(field: &str, ms: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| SyncError::InvalidConfigValueError {
        field: field.to_string(),
        value: ms.to_string(),
        reason: "Timestamp is outside the supported calendar range".to_string(),
    })
}

fn required<'a>(query: &'a HashMap<String, String>, key: &str) -> Result<&'a String> {
    query.get(key).ok_or_else(|| SyncError::MissingConfigError {
        field: format!("calendar.url?{}", key),
    })
}

fn parse_param<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| SyncError::InvalidConfigValueError {
            field: format!("calendar.url?{}", key),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
