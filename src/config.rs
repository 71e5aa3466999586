use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Backend address used when `BRIEF_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Number of characters shown when previewing extracted text.
pub const DEFAULT_PREVIEW_CHARS: usize = 5000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Brief client.
///
/// The Q&A credential is intentionally absent: it is read at request time and never cached.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the extraction/summarization backend.
    pub api_url: String,
    /// Directory that receives exported artifacts.
    pub output_dir: PathBuf,
    /// Maximum number of characters shown when previewing extracted text.
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from("."),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url =
            load_env_optional("BRIEF_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        reqwest::Url::parse(&api_url)
            .map_err(|_| ConfigError::InvalidValue("BRIEF_API_URL".to_string()))?;

        Ok(Self {
            api_url,
            output_dir: load_env_optional("BRIEF_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            preview_chars: load_env_optional("BRIEF_PREVIEW_CHARS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("BRIEF_PREVIEW_CHARS".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PREVIEW_CHARS),
        })
    }
}

/// Read a variable that must be present.
pub fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        api_url = %config.api_url,
        output_dir = %config.output_dir.display(),
        preview_chars = config.preview_chars,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.preview_chars, 5000);
    }

    #[test]
    fn missing_required_variable_is_reported_by_name() {
        let error = load_env("BRIEF_TEST_VARIABLE_THAT_IS_NEVER_SET").expect_err("missing");
        assert!(matches!(error, ConfigError::MissingVariable(name) if name.contains("NEVER_SET")));
    }
}
