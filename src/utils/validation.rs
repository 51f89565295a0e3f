use crate::utils::error::{CheckError, Result};
use chrono::format::{Item, StrftimeItems};
use regex::Regex;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(CheckError::ConfigError {
            message: format!("{}: value must be at least {}", field_name, min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CheckError::ConfigError {
            message: format!("{}: value cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_request_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if !path.starts_with('/') {
        return Err(CheckError::ConfigError {
            message: format!("{}: request path must start with '/': {}", field_name, path),
        });
    }
    Ok(())
}

/// chrono panics when an invalid strftime specifier is actually formatted,
/// so bad formats must be caught here, before the pipeline starts.
pub fn validate_time_format(field_name: &str, format: &str) -> Result<()> {
    validate_non_empty_string(field_name, format)?;

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(CheckError::ConfigError {
            message: format!("{}: invalid timestamp format: {}", field_name, format),
        });
    }
    Ok(())
}

/// The domain pattern must compile and carry exactly one capture group,
/// which is the matched domain name.
pub fn validate_domain_pattern(field_name: &str, pattern: &str) -> Result<Regex> {
    let re = Regex::new(pattern)?;

    if re.captures_len() != 2 {
        return Err(CheckError::ConfigError {
            message: format!(
                "{}: pattern must have exactly one capture group for the domain name: {}",
                field_name, pattern
            ),
        });
    }
    Ok(re)
}
