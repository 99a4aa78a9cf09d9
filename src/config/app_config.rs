use std::collections::HashMap;

use serde::Deserialize;

use crate::infrastructure::llm::ProviderConfig;

/// Application configuration
///
/// Layered from `config/default`, `config/local`, then `APP__`-prefixed
/// environment variables. Credentials never appear here directly; provider
/// sections name the environment variable holding each API key.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    pub imagery: ImageryConfig,
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Outbound HTTP behavior: one explicit timeout for every external call,
/// no retries.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Mapillary-style imagery lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImageryConfig {
    pub graph_base_url: String,
    pub access_token_env: String,
}

/// Which configured provider handles text-only reconciliation calls
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    pub provider: String,
}

/// Optional instruction template overrides
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PromptsConfig {
    #[serde(default)]
    pub recognize: Option<String>,
    #[serde(default)]
    pub validate: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
