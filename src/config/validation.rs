use crate::config::types::{Config, OutputConfig, RunnerConfig, ServiceConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_service_config(&config.service)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_runner_config(&config.runner)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates audit backend configuration
fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= 1s, got {}s",
            config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Name: non-empty, alphanumeric + hyphens only
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates batch runner configuration
fn validate_runner_config(config: &RunnerConfig) -> Result<(), ConfigError> {
    if config.initial_seconds_per_url < 1 {
        return Err(ConfigError::Validation(format!(
            "initial_seconds_per_url must be >= 1, got {}",
            config.initial_seconds_per_url
        )));
    }

    if let Some(timeout) = config.item_timeout {
        if timeout < 1 {
            return Err(ConfigError::Validation(format!(
                "item_timeout must be >= 1s, got {}s",
                timeout
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "file_prefix cannot be empty".to_string(),
        ));
    }

    // The prefix becomes part of a file name
    if config.file_prefix.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "file_prefix cannot contain path separators, got '{}'",
            config.file_prefix
        )));
    }

    if matches!(config.report_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = ServiceConfig::default();
        assert!(validate_service_config(&config).is_ok());

        config.endpoint = "not a url".to_string();
        assert!(matches!(
            validate_service_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.endpoint = "ftp://audit.example.com/run".to_string();
        assert!(matches!(
            validate_service_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_timeouts() {
        let mut config = ServiceConfig::default();
        config.request_timeout = 0;
        assert!(validate_service_config(&config).is_err());

        let mut runner = RunnerConfig::default();
        runner.item_timeout = Some(0);
        assert!(validate_runner_config(&runner).is_err());

        runner.item_timeout = Some(30);
        assert!(validate_runner_config(&runner).is_ok());
    }

    #[test]
    fn test_validate_user_agent_name() {
        let mut config = UserAgentConfig::default();
        assert!(validate_user_agent_config(&config).is_ok());

        config.name = "gtm audit".to_string();
        assert!(validate_user_agent_config(&config).is_err());

        config.name = String::new();
        assert!(validate_user_agent_config(&config).is_err());
    }

    #[test]
    fn test_validate_output() {
        let mut config = OutputConfig::default();
        assert!(validate_output_config(&config).is_ok());

        config.file_prefix = "exports/GTM".to_string();
        assert!(validate_output_config(&config).is_err());

        config.file_prefix = "GTM".to_string();
        config.report_path = Some(String::new());
        assert!(validate_output_config(&config).is_err());
    }
}
