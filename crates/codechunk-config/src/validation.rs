//! Configuration validation framework

use crate::{ConfigError, ConfigResult};

/// Trait for validating configuration values
pub trait Validate {
    /// Validate this configuration object
    ///
    /// # Errors
    /// Returns validation errors if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Validate a value is within a range
///
/// # Errors
/// Returns `ConfigError::OutOfRange` if value is outside the specified range
pub fn validate_range(value: u64, min: u64, max: u64, field_name: &str) -> ConfigResult<()> {
    if value < min || value > max {
        Err(ConfigError::OutOfRange {
            field: field_name.to_string(),
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

/// Validate a string is not empty
///
/// # Errors
/// Returns `ConfigError::MissingField` if the string is empty or whitespace-only
pub fn validate_non_empty(value: &str, field_name: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField {
            field: field_name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Validate a string is one of `choices` (case-insensitive)
///
/// # Errors
/// Returns `ConfigError::InvalidChoice` if no choice matches
pub fn validate_choice(value: &str, choices: &[&str], field_name: &str) -> ConfigResult<()> {
    if choices
        .iter()
        .any(|choice| choice.eq_ignore_ascii_case(value.trim()))
    {
        Ok(())
    } else {
        Err(ConfigError::InvalidChoice {
            field: field_name.to_string(),
            value: value.to_string(),
            expected: choices.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range_bounds_are_inclusive() {
        assert!(validate_range(1, 1, 10, "n").is_ok());
        assert!(validate_range(10, 1, 10, "n").is_ok());

        let err = validate_range(11, 1, 10, "scan.concurrency").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Value 11 is out of range for scan.concurrency (expected 1-10)"
        );
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("info", "logging.level").is_ok());
        assert!(matches!(
            validate_non_empty("   ", "logging.level"),
            Err(ConfigError::MissingField { field }) if field == "logging.level"
        ));
    }

    #[test]
    fn test_validate_choice_ignores_case() {
        assert!(validate_choice("DEBUG", &["debug", "info"], "level").is_ok());
        assert!(validate_choice("loud", &["debug", "info"], "level").is_err());
    }
}
