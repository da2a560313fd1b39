use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed GET channel: {status} {body}")]
    RemoteReadError { status: u16, body: String },

    #[error("Failed to update channel: {status} {body}")]
    RemoteWriteError { status: u16, body: String },

    #[error("Failed GET channel: {source}")]
    RemoteReadTransport { source: reqwest::Error },

    #[error("Failed to update channel: {source}")]
    RemoteWriteTransport { source: reqwest::Error },

    #[error("Request blocked by upstream firewall: {status} {body}")]
    TransientBlock { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    RemoteRead,
    RemoteWrite,
    Network,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::IoError(_) => ErrorCategory::Configuration,
            SyncError::RemoteReadError { .. } | SyncError::RemoteReadTransport { .. } => {
                ErrorCategory::RemoteRead
            }
            SyncError::RemoteWriteError { .. } | SyncError::RemoteWriteTransport { .. } => {
                ErrorCategory::RemoteWrite
            }
            SyncError::HttpError(_) | SyncError::TransientBlock { .. } => ErrorCategory::Network,
            SyncError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Network if self.is_transient_block() => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    /// 對應 process exit code
    pub fn exit_code(&self) -> u8 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Exit code for a failed run. `always_exit_zero` only silences run
    /// failures; configuration errors still exit non-zero.
    pub fn run_exit_code(&self, always_exit_zero: bool) -> u8 {
        if always_exit_zero && self.category() != ErrorCategory::Configuration {
            0
        } else {
            self.exit_code()
        }
    }

    /// 以呼叫端區分傳輸層失敗：讀取或寫入
    pub fn on_read(self) -> Self {
        match self {
            SyncError::HttpError(source) => SyncError::RemoteReadTransport { source },
            SyncError::TransientBlock { status, body } => SyncError::RemoteReadError { status, body },
            other => other,
        }
    }

    pub fn on_write(self) -> Self {
        match self {
            SyncError::HttpError(source) => SyncError::RemoteWriteTransport { source },
            SyncError::TransientBlock { status, body } => SyncError::RemoteWriteError { status, body },
            other => other,
        }
    }

    pub fn is_transient_block(&self) -> bool {
        matches!(self, SyncError::TransientBlock { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::MissingConfigError { .. } => {
                "Set the missing value in the environment or the TOML config file"
            }
            SyncError::InvalidConfigValueError { .. } | SyncError::ConfigError { .. } => {
                "Check the calendar URL and channel settings"
            }
            SyncError::IoError(_) => "Make sure the config file exists and is readable",
            SyncError::TransientBlock { .. } => {
                "The API edge is rate limiting this runner; wait before the next scheduled run"
            }
            SyncError::RemoteReadError { status: 401, .. }
            | SyncError::RemoteWriteError { status: 401, .. } => "Verify DISCORD_TOKEN is a valid bot token",
            SyncError::RemoteReadError { status: 403, .. }
            | SyncError::RemoteWriteError { status: 403, .. } => {
                "Grant the bot the Manage Channels permission on this channel"
            }
            SyncError::RemoteReadError { status: 404, .. } => "Verify CHANNEL_ID points at an existing channel",
            SyncError::RemoteReadError { .. } | SyncError::RemoteWriteError { .. } => {
                "Check the API response body for details"
            }
            SyncError::HttpError(_)
            | SyncError::RemoteReadTransport { .. }
            | SyncError::RemoteWriteTransport { .. } => "Check network connectivity and the API base URL",
            SyncError::SerializationError(_) => "The API returned an unexpected payload",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::RemoteRead => format!("Error fetching channel info: {}", self),
            ErrorCategory::RemoteWrite => format!("Failed to update channel: {}", self),
            ErrorCategory::Network => format!("Network problem talking to the API: {}", self),
            ErrorCategory::Data => format!("Could not read the API response: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
