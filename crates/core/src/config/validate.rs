use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one search engine, quality tier and report kind
/// - Non-blank JVM memory ceiling and DIA-Umpire log name
/// - Timeout, when set, is not 0
/// - Reference name, when set, is not blank and contains no path separator
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.search.engines.is_empty() {
        return Err(ConfigError::ValidationError(
            "search.engines cannot be empty".to_string(),
        ));
    }
    if config.search.engines.iter().any(|e| e.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "search.engines cannot contain blank names".to_string(),
        ));
    }

    if config.search.tiers.is_empty() {
        return Err(ConfigError::ValidationError(
            "search.tiers cannot be empty".to_string(),
        ));
    }

    if config.reports.kinds.is_empty() {
        return Err(ConfigError::ValidationError(
            "reports.kinds cannot be empty".to_string(),
        ));
    }

    if config.deconvolution.max_memory.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "deconvolution.max_memory cannot be blank".to_string(),
        ));
    }

    if config.deconvolution.log_file_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "deconvolution.log_file_name cannot be blank".to_string(),
        ));
    }

    if config.tools.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "tools.timeout_secs cannot be 0".to_string(),
        ));
    }

    if let Some(name) = &config.reference_name {
        if name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "reference_name cannot be blank".to_string(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "reference_name cannot contain path separators: {name}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_tiers_fails() {
        let mut config = Config::default();
        config.search.tiers.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_engines_fails() {
        let mut config = Config::default();
        config.search.engines = vec![" ".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.tools.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
        config.tools.timeout_secs = Some(30);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_reference_name() {
        let mut config = Config::default();
        config.reference_name = Some("  ".to_string());
        assert!(validate_config(&config).is_err());
        config.reference_name = Some("../escape".to_string());
        assert!(validate_config(&config).is_err());
        config.reference_name = Some("liver_run".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
