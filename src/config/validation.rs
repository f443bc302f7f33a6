use crate::config::types::{ClientConfig, EndpointConfig, ScanConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on scan concurrency
const MAX_CONCURRENCY: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_endpoint_config(&config.endpoints)?;
    validate_scan_config(&config.scan)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Client name: non-empty, alphanumeric + hyphens only
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client_name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    if config.client_version.is_empty() {
        return Err(ConfigError::Validation(
            "client_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates endpoint base URLs
fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    validate_base_url("comic_base_url", &config.comic_base_url)?;
    validate_base_url("what_if_base_url", &config.what_if_base_url)?;
    validate_base_url("wiki_base_url", &config.wiki_base_url)?;
    Ok(())
}

/// A base URL must be http(s) and end with '/' so that joining keeps its path
fn validate_base_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must end with '/'",
            name, value
        )));
    }

    Ok(())
}

/// Validates scan configuration
fn validate_scan_config(config: &ScanConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}
