use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Reads, parses and validates a TOML configuration file
///
/// Nothing touches the network before this succeeds; command-line overrides
/// applied afterwards must go through [`validate`] again.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use vk_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// if let Some(target) = &config.target {
///     println!("Posts per crawl: {}", target.count);
/// }
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = toml::from_str::<Config>(&std::fs::read_to_string(path)?)?;
    validate(&config)?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
