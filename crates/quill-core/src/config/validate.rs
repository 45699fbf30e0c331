//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.base_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "retry.base_delay_ms must be > 0".into(),
            ));
        }
        if self.retry.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "retry.timeout_ms must be > 0".into(),
            ));
        }
        if let Some(deadline_ms) = self.retry.deadline_ms {
            if deadline_ms < self.retry.timeout_ms {
                return Err(ConfigError::ValidationError(
                    "retry.deadline_ms must be >= retry.timeout_ms".into(),
                ));
            }
        }
        if self.generation.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_output_tokens must be > 0".into(),
            ));
        }
        if self.output.dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_base_delay() {
        let mut config = Config::default();
        config.retry.base_delay_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_delay_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.retry.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_deadline_below_timeout() {
        let mut config = Config::default();
        config.retry.deadline_ms = Some(1000); // < timeout_ms (60s)
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("deadline_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = Config::default();
        config.generation.max_output_tokens = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_output_tokens"));
    }

    #[test]
    fn test_validate_rejects_empty_output_dir() {
        let mut config = Config::default();
        config.output.dir = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.dir"));
    }
}
