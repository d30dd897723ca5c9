pub(crate) use crate::config::authority::AuthorityConfig;
pub(crate) use crate::config::enforcement::EnforcementConfig;
use confique::Config;
use std::path::Path;
use thiserror::Error;

pub mod authority;
pub mod enforcement;

/// Environment variable pointing at an optional TOML configuration file
pub const CONFIG_FILE_ENV: &str = "PEP_CONFIG_FILE";

/// Configuration file used when `PEP_CONFIG_FILE` is not set
pub const DEFAULT_CONFIG_FILE: &str = "pep.toml";

/// Main configuration structure for the PEP server
#[derive(Debug, Config, Clone)]
pub struct PEPConfig {
    /// The port the PEP server will listen to (default: 3000)
    #[config(env = "PEP_PORT", default = 3000)]
    pub port: u16,

    /// Decision authority configuration
    #[config(nested)]
    pub authority: AuthorityConfig,

    /// Enforcement middleware configuration
    #[config(nested)]
    pub enforcement: EnforcementConfig,
}

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] confique::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl PEPConfig {
    /// Creates a new Config instance from environment variables and the optional config file.
    ///
    /// Environment variables take precedence over the file, the file over the defaults.
    /// A missing config file is not an error.
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let config = Self::builder().env().file(path).load()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from a TOML file only, ignoring the environment
    #[allow(dead_code)]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::builder().file(path.as_ref()).load()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that the type system can't
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.authority.validate().map_err(ConfigError::Invalid)?;
        self.enforcement.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn for_test_with_mock(authority_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            // Use the mock server address for testing
            authority: AuthorityConfig {
                host: authority_mock.address().ip().to_string(),
                port: authority_mock.address().port(),
                scheme: "http".to_string(),
                query_timeout: 2,
                connect_timeout: 1,
            },
            enforcement: EnforcementConfig {
                fail_open: false,
                forward_context: true,
                identity_header: "user".to_string(),
                require_identity: false,
                max_body_bytes: 64 * 1024,
            },
        }
    }
}
