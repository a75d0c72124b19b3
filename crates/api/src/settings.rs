//! Application Configuration
//!
//! Layered: built-in defaults, then `config/default.toml`, then the file named
//! by `ADPREDICT_CONFIG`, then `ADPREDICT__SECTION__KEY` environment
//! variables. `GEMINI_API_KEY`, `JWT_SECRET` and `PORT` are honoured directly.

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigError, Environment, File};
use oracle::GeminiConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub oracle: OracleConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// External AI settings; an empty key disables the oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        let gemini = GeminiConfig::new("");
        Self {
            api_key: gemini.api_key,
            model: gemini.model,
            base_url: gemini.base_url,
            timeout_ms: gemini.timeout_ms,
        }
    }
}

impl OracleConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn to_gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

/// Secret used when none is configured. Fine for local runs only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_secs: 30 * 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub sqlite_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            sqlite_url: "sqlite://adpredict.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from all layers
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false));

        if let Ok(path) = std::env::var("ADPREDICT_CONFIG") {
            builder = builder.add_source(File::with_name(&path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("ADPREDICT")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("oracle.api_key", std::env::var("GEMINI_API_KEY").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    /// Defaults suitable for tests: in-memory storage, no oracle, no rate
    /// limiting
    pub fn for_tests(jwt_secret: &str) -> Self {
        let mut config = Self::default();
        config.auth.jwt_secret = jwt_secret.to_string();
        config.rate_limit.enabled = false;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.body_limit_bytes, 10 * 1024 * 1024);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.token_ttl_secs, 2_592_000);
        assert!(!config.oracle.is_configured());
        assert_eq!(config.oracle.model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_defaults_survive_config_roundtrip() {
        let built = Config::builder()
            .add_source(Config::try_from(&AppConfig::default()).unwrap())
            .build()
            .unwrap();
        let config: AppConfig = built.try_deserialize().unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let built = Config::builder()
            .add_source(Config::try_from(&AppConfig::default()).unwrap())
            .add_source(config::File::from_str(
                "[server]\nport = 8081\n[storage]\nbackend = \"sqlite\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = built.try_deserialize().unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    }
}
