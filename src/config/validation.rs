use crate::config::types::{ApiConfig, Config, MembersConfig, OutputConfig, TargetConfig};
use crate::ConfigError;
use url::Url;

/// Export formats the output module knows how to write
const KNOWN_FORMATS: [&str; 3] = ["json", "csv", "xlsx"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    if config.target.is_none() && config.members.is_none() {
        return Err(ConfigError::Validation(
            "config needs a [target] or a [members] section".to_string(),
        ));
    }
    if let Some(target) = &config.target {
        validate_target_config(target)?;
    }
    if let Some(members) = &config.members {
        validate_members_config(members)?;
    }
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API access configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.token.trim().is_empty() {
        return Err(ConfigError::Validation("token cannot be empty".to_string()));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "version cannot be empty".to_string(),
        ));
    }

    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use HTTP or HTTPS",
            config.base_url
        )));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the crawl target
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    validate_domain(&config.domain)?;

    if config.owner_id == 0 {
        return Err(ConfigError::Validation(
            "owner-id cannot be zero".to_string(),
        ));
    }

    if config.count < 1 || config.count > 100 {
        return Err(ConfigError::Validation(format!(
            "count must be between 1 and 100, got {}",
            config.count
        )));
    }

    Ok(())
}

/// Validates member listing parameters
fn validate_members_config(config: &MembersConfig) -> Result<(), ConfigError> {
    if config.group_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "members group-id cannot be empty".to_string(),
        ));
    }

    if config.count < 1 || config.count > 1000 {
        return Err(ConfigError::Validation(format!(
            "members count must be between 1 and 1000, got {}",
            config.count
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.formats.is_empty() {
        return Err(ConfigError::Validation(
            "at least one output format is required".to_string(),
        ));
    }

    for format in &config.formats {
        if !KNOWN_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown output format '{}', expected one of {:?}",
                format, KNOWN_FORMATS
            )));
        }
    }

    if let Some(base_name) = &config.base_name {
        if base_name.is_empty() || base_name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "base-name '{}' must be a non-empty file name",
                base_name
            )));
        }
    }

    Ok(())
}

/// Validates a community short address
fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "domain '{}' must contain only letters, digits, '_' and '.'",
            domain
        )));
    }

    Ok(())
}
