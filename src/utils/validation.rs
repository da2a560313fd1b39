use crate::utils::error::{Result, SyncError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SyncError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_positive_real(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number greater than zero".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SyncError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Discord IDs are decimal snowflakes.
pub fn validate_snowflake(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "ID must contain only digits".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("discord.api_base", "https://discord.com/api/v10").is_ok());
        assert!(validate_url("discord.api_base", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("discord.api_base", "").is_err());
        assert!(validate_url("discord.api_base", "invalid-url").is_err());
        assert!(validate_url("discord.api_base", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_real() {
        assert!(validate_positive_real("calendar.days_per_year", 7.0).is_ok());
        assert!(validate_positive_real("calendar.days_per_year", 0.5).is_ok());
        assert!(validate_positive_real("calendar.days_per_year", 0.0).is_err());
        assert!(validate_positive_real("calendar.days_per_year", -7.0).is_err());
        assert!(validate_positive_real("calendar.days_per_year", f64::NAN).is_err());
        assert!(validate_positive_real("calendar.days_per_year", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_snowflake() {
        assert!(validate_snowflake("discord.channel_id", "1417630872924061846").is_ok());
        assert!(validate_snowflake("discord.channel_id", "").is_err());
        assert!(validate_snowflake("discord.channel_id", "general").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("token".to_string());
        assert_eq!(validate_required_field("DISCORD_TOKEN", &present).unwrap(), "token");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("DISCORD_TOKEN", &missing),
            Err(SyncError::MissingConfigError { .. })
        ));
    }
}
