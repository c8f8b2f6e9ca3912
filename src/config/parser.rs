use crate::config::CrawlConfig;
use crate::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;

/// Loads and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - File missing, malformed TOML, or invalid values
pub fn load_config(path: &Path) -> ConfigResult<CrawlConfig> {
    let content = fs::read_to_string(path)?;
    let config: CrawlConfig = toml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates configuration values
///
/// `max_pages` of zero is deliberately allowed: it is the documented way to
/// get an empty report without navigating anywhere.
pub fn validate_config(config: &CrawlConfig) -> ConfigResult<()> {
    if config.viewport.width == 0 || config.viewport.height == 0 {
        return Err(ConfigError::Validation(format!(
            "viewport must be non-zero, got {}x{}",
            config.viewport.width, config.viewport.height
        )));
    }

    if config.page_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "page-timeout-ms must be greater than zero".to_string(),
        ));
    }

    if config.link_probe_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "link-probe-timeout-ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
