pub mod calendar;
#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::label::DEFAULT_ICON;
use crate::core::retry::RetryPolicy;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_required_field, validate_snowflake,
    validate_url, Validate,
};
use calendar::{CalendarConfig, DEFAULT_CALCULATOR_URL};
use std::fmt;

pub const DEFAULT_CHANNEL_ID: &str = "1417630872924061846";
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
/// Cloudflare 的限流封鎖頁面內容
pub const DEFAULT_BLOCK_MARKER: &str = "error code: 1015";

#[derive(Clone)]
pub struct DiscordSettings {
    pub token: String,
    pub channel_id: String,
    pub api_base: String,
    pub timeout_seconds: u64,
    pub block_marker: String,
}

impl fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordSettings")
            .field("token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("block_marker", &self.block_marker)
            .finish()
    }
}

/// 一次執行所需的全部設定，在 main 建立後不再變動
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub discord: DiscordSettings,
    pub calendar: CalendarConfig,
    pub retry: RetryPolicy,
    pub icon: String,
    /// Exit 0 even when the run fails.
    pub always_exit_zero: bool,
}

impl SyncConfig {
    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`SyncConfig::from_env`] with an injectable variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = var("DISCORD_TOKEN").filter(|t| !t.trim().is_empty());
        let token = validate_required_field("DISCORD_TOKEN", &token)?.clone();

        let (calendar, icon) = calendar_from_vars(&var)?;

        let always_exit_zero = match var("ALWAYS_EXIT_ZERO") {
            Some(raw) => parse_bool("ALWAYS_EXIT_ZERO", &raw)?,
            None => false,
        };

        let config = Self {
            discord: DiscordSettings {
                token,
                channel_id: var("CHANNEL_ID").unwrap_or_else(|| DEFAULT_CHANNEL_ID.to_string()),
                api_base: var("DISCORD_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
                block_marker: DEFAULT_BLOCK_MARKER.to_string(),
            },
            calendar,
            retry: RetryPolicy::default(),
            icon,
            always_exit_zero,
        };
        config.validate()?;
        Ok(config)
    }
}

/// 預覽只需要曆法與圖示，不需要 bot token
pub fn preview_from_env() -> Result<(CalendarConfig, String)> {
    preview_from_vars(|key| std::env::var(key).ok())
}

pub fn preview_from_vars<F>(var: F) -> Result<(CalendarConfig, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let (calendar, icon) = calendar_from_vars(&var)?;
    validate_non_empty_string("CHANNEL_ICON", &icon)?;
    Ok((calendar, icon))
}

/// `CALENDAR_URL` and `CHANNEL_ICON`, shared by the run and preview paths.
fn calendar_from_vars<F>(var: &F) -> Result<(CalendarConfig, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let calendar_url = var("CALENDAR_URL").unwrap_or_else(|| DEFAULT_CALCULATOR_URL.to_string());
    let calendar = CalendarConfig::from_calculator_url(&calendar_url)?;
    let icon = var("CHANNEL_ICON").unwrap_or_else(|| DEFAULT_ICON.to_string());
    Ok((calendar, icon))
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("discord.token", &self.discord.token)?;
        validate_snowflake("discord.channel_id", &self.discord.channel_id)?;
        validate_url("discord.api_base", &self.discord.api_base)?;
        validate_positive_number("discord.timeout_seconds", self.discord.timeout_seconds, 1)?;
        validate_positive_number("retry.max_attempts", self.retry.max_attempts as u64, 1)?;
        validate_non_empty_string("label.icon", &self.icon)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

pub(crate) fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SyncError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_vars_uses_defaults() {
        let config = SyncConfig::from_vars(vars(&[("DISCORD_TOKEN", "abc")])).unwrap();

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.channel_id, DEFAULT_CHANNEL_ID);
        assert_eq!(config.discord.api_base, DEFAULT_API_BASE);
        assert_eq!(config.calendar, CalendarConfig::default());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.icon, "📅");
        assert!(!config.always_exit_zero);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = SyncConfig::from_vars(vars(&[])).unwrap_err();
        assert!(matches!(err, SyncError::MissingConfigError { ref field } if field == "DISCORD_TOKEN"));

        let blank = SyncConfig::from_vars(vars(&[("DISCORD_TOKEN", "   ")])).unwrap_err();
        assert!(matches!(blank, SyncError::MissingConfigError { .. }));
    }

    #[test]
    fn test_overrides_from_vars() {
        let config = SyncConfig::from_vars(vars(&[
            ("DISCORD_TOKEN", "abc"),
            ("CHANNEL_ID", "42"),
            ("DISCORD_API_BASE", "http://127.0.0.1:9000"),
            (
                "CALENDAR_URL",
                "https://example.com/?daysperyear=14&lastdatechange=0&lastdateepoch=0",
            ),
            ("CHANNEL_ICON", "🗓️"),
            ("ALWAYS_EXIT_ZERO", "true"),
        ]))
        .unwrap();

        assert_eq!(config.discord.channel_id, "42");
        assert_eq!(config.discord.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.calendar.month_duration_ms(), 28 * 3_600_000);
        assert_eq!(config.icon, "🗓️");
        assert!(config.always_exit_zero);
    }

    #[test]
    fn test_invalid_channel_id_is_rejected() {
        let err = SyncConfig::from_vars(vars(&[("DISCORD_TOKEN", "abc"), ("CHANNEL_ID", "general")]))
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = SyncConfig::from_vars(vars(&[("DISCORD_TOKEN", "super-secret")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_preview_does_not_need_token() {
        let (calendar, icon) = preview_from_vars(vars(&[])).unwrap();
        assert_eq!(calendar, CalendarConfig::default());
        assert_eq!(icon, DEFAULT_ICON);

        let (calendar, icon) = preview_from_vars(vars(&[
            (
                "CALENDAR_URL",
                "https://example.com/?daysperyear=14&lastdatechange=0&lastdateepoch=0",
            ),
            ("CHANNEL_ICON", "🗓️"),
        ]))
        .unwrap();
        assert_eq!(calendar.month_duration_ms(), 28 * 3_600_000);
        assert_eq!(icon, "🗓️");
    }

    #[test]
    fn test_preview_and_run_read_calendar_the_same_way() {
        let pairs = [
            ("DISCORD_TOKEN", "abc"),
            (
                "CALENDAR_URL",
                "https://example.com/?daysperyear=3&lastdatechange=1000&lastdateepoch=0",
            ),
            ("CHANNEL_ICON", "🌙"),
        ];
        let config = SyncConfig::from_vars(vars(&pairs)).unwrap();
        let (calendar, icon) = preview_from_vars(vars(&pairs)).unwrap();

        assert_eq!(config.calendar, calendar);
        assert_eq!(config.icon, icon);

        let bad = preview_from_vars(vars(&[("CALENDAR_URL", "not a url")])).unwrap_err();
        assert!(matches!(bad, SyncError::InvalidConfigValueError { .. }));
        assert!(preview_from_vars(vars(&[("CHANNEL_ICON", "")])).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("x", "TRUE").unwrap());
        assert!(!parse_bool("x", "0").unwrap());
        assert!(parse_bool("x", "maybe").is_err());
    }
}
