use crate::config::calendar::{CalendarConfig, DEFAULT_CALCULATOR_URL};
use crate::config::{
    DiscordSettings, SyncConfig, DEFAULT_API_BASE, DEFAULT_BLOCK_MARKER, DEFAULT_CHANNEL_ID,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::label::DEFAULT_ICON;
use crate::core::retry::RetryPolicy;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub discord: DiscordSection,
    #[serde(default)]
    pub calendar: CalendarSection,
    pub retry: Option<RetrySection>,
    pub label: Option<LabelSection>,
    pub run: Option<RunSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordSection {
    pub token: Option<String>,
    pub channel_id: Option<String>,
    pub api_base: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub block_marker: Option<String>,
}

/// 可以給換算器網址，或直接給三個錨點參數（兩者擇一）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarSection {
    pub url: Option<String>,
    pub days_per_year: Option<f64>,
    pub last_date_change: Option<i64>,
    pub last_date_epoch: Option<i64>,
    pub fixed_years: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySection {
    pub max_attempts: Option<u32>,
    pub backoff_seconds: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSection {
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    pub always_exit_zero: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DISCORD_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn calendar_config(&self) -> Result<CalendarConfig> {
        let section = &self.calendar;
        match (section.last_date_change, section.last_date_epoch) {
            (Some(change), Some(epoch)) => {
                if section.url.is_some() {
                    tracing::warn!("calendar.url ignored because explicit anchors are set");
                }
                CalendarConfig::new(
                    section.days_per_year.unwrap_or(7.0),
                    change,
                    epoch,
                    section.fixed_years.unwrap_or(false),
                )
            }
            (None, None) => {
                CalendarConfig::from_calculator_url(section.url.as_deref().unwrap_or(DEFAULT_CALCULATOR_URL))
            }
            (Some(_), None) => Err(SyncError::MissingConfigError {
                field: "calendar.last_date_epoch".to_string(),
            }),
            (None, Some(_)) => Err(SyncError::MissingConfigError {
                field: "calendar.last_date_change".to_string(),
            }),
        }
    }

    pub fn icon(&self) -> String {
        self.label
            .as_ref()
            .and_then(|l| l.icon.clone())
            .unwrap_or_else(|| DEFAULT_ICON.to_string())
    }

    /// Calendar and icon for `--preview`; the Discord section may be incomplete.
    pub fn preview(&self) -> Result<(CalendarConfig, String)> {
        let icon = self.icon();
        validate_non_empty_string("label.icon", &icon)?;
        Ok((self.calendar_config()?, icon))
    }

    fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        match &self.retry {
            Some(section) => RetryPolicy::new(
                section.max_attempts.unwrap_or(defaults.max_attempts),
                section
                    .backoff_seconds
                    .as_ref()
                    .map(|secs| secs.iter().copied().map(Duration::from_secs).collect())
                    .unwrap_or(defaults.backoff),
            ),
            None => defaults,
        }
    }

    /// 轉成執行用的 [`SyncConfig`] 並驗證
    pub fn into_sync_config(self) -> Result<SyncConfig> {
        // 未被替換的 ${...} 代表環境變數沒設定
        let token = self
            .discord
            .token
            .clone()
            .filter(|t| !t.trim().is_empty() && !t.contains("${"))
            .ok_or_else(|| SyncError::MissingConfigError {
                field: "discord.token".to_string(),
            })?;

        let config = SyncConfig {
            discord: DiscordSettings {
                token,
                channel_id: self
                    .discord
                    .channel_id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHANNEL_ID.to_string()),
                api_base: self
                    .discord
                    .api_base
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timeout_seconds: self.discord.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
                block_marker: self
                    .discord
                    .block_marker
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BLOCK_MARKER.to_string()),
            },
            calendar: self.calendar_config()?,
            retry: self.retry_policy(),
            icon: self.icon(),
            always_exit_zero: self
                .run
                .as_ref()
                .and_then(|r| r.always_exit_zero)
                .unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }
}

impl SyncConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        TomlConfig::from_file(path)?.into_sync_config()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        TomlConfig::from_toml_str(content)?.into_sync_config()
    }
}
