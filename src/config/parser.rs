use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable holding the language model API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the language model base URL
pub const BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";

/// Environment variable overriding the language model identifier
pub const MODEL_ENV: &str = "OPENROUTER_MODEL";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied after parsing and before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_glean::config::load_config;
///
/// let config = load_config(Path::new("glean.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text, applying environment overrides
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Builds the configuration used when no file is given
///
/// Defaults for every section, plus environment overrides.
pub fn default_config() -> Result<Config, ConfigError> {
    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Applies environment overrides to the language model section
///
/// The API key from the environment only fills a missing key; base URL and
/// model from the environment always win over the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if config.llm.api_key.is_none() {
        config.llm.api_key = non_empty(API_KEY_ENV);
    }

    if let Some(base_url) = non_empty(BASE_URL_ENV) {
        config.llm.base_url = base_url;
    }

    if let Some(model) = non_empty(MODEL_ENV) {
        config.llm.model = model;
    }
}
