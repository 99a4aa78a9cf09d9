use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::http_client::HttpClient;
use super::{AnthropicProvider, OpenAiCompatProvider};
use crate::domain::{DomainError, LlmProvider};

/// Provider wiring from configuration. Credentials are always referenced by
/// environment variable name, never inlined.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    #[serde(rename = "openai_compat")]
    OpenAiCompat {
        base_url: String,
        model: String,
        api_key_env: String,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
    Anthropic {
        #[serde(default)]
        base_url: Option<String>,
        model: String,
        api_key_env: String,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
}

/// A configured provider: the gateway object plus its vendor model id and
/// output cap.
#[derive(Debug, Clone)]
pub struct ProviderHandle {
    pub provider: Arc<dyn LlmProvider>,
    pub model: String,
    pub max_tokens: Option<u32>,
}

/// Config-keyed registry of LLM providers.
///
/// Adding a provider is a configuration change, not a code change: every
/// entry is selected by its key in the `providers` table.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderHandle>,
}

impl ProviderRegistry {
    /// Build all providers from configuration, resolving API keys from the
    /// named environment variables.
    pub fn from_config(
        configs: &HashMap<String, ProviderConfig>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let mut providers = HashMap::new();

        for (id, config) in configs {
            let handle = match config {
                ProviderConfig::OpenAiCompat {
                    base_url,
                    model,
                    api_key_env,
                    max_tokens,
                } => {
                    let api_key = resolve_api_key(id, api_key_env)?;
                    let client = HttpClient::new(timeout)?;
                    ProviderHandle {
                        provider: Arc::new(OpenAiCompatProvider::new(client, api_key, base_url)),
                        model: model.clone(),
                        max_tokens: *max_tokens,
                    }
                }
                ProviderConfig::Anthropic {
                    base_url,
                    model,
                    api_key_env,
                    max_tokens,
                } => {
                    let api_key = resolve_api_key(id, api_key_env)?;
                    let client = HttpClient::new(timeout)?;
                    let provider: Arc<dyn LlmProvider> = match base_url {
                        Some(url) => {
                            Arc::new(AnthropicProvider::with_base_url(client, api_key, url))
                        }
                        None => Arc::new(AnthropicProvider::new(client, api_key)),
                    };
                    ProviderHandle {
                        provider,
                        model: model.clone(),
                        max_tokens: *max_tokens,
                    }
                }
            };

            providers.insert(id.clone(), handle);
        }

        Ok(Self { providers })
    }

    pub fn insert(&mut self, id: impl Into<String>, handle: ProviderHandle) {
        self.providers.insert(id.into(), handle);
    }

    pub fn get(&self, id: &str) -> Result<&ProviderHandle, DomainError> {
        self.providers
            .get(id)
            .ok_or_else(|| DomainError::unknown_provider(id))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}

fn resolve_api_key(provider_id: &str, env_var: &str) -> Result<String, DomainError> {
    std::env::var(env_var).map_err(|_| {
        DomainError::configuration(format!(
            "Provider '{provider_id}' requires the {env_var} environment variable"
        ))
    })
}
