//! Traffic-sign recognition relay
//!
//! A thin HTTP service that forwards street-level imagery to configured
//! multimodal LLM providers and returns their raw text answers. Images come
//! in as direct uploads or as Mapillary photo identifiers; a second endpoint
//! cross-checks two recognition answers with a text-only provider call.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use domain::{DomainError, PromptCatalog};
use infrastructure::imagery::MapillaryAcquirer;
use infrastructure::llm::ProviderRegistry;
use infrastructure::recognition::RelayService;

/// Build the application state from configuration.
///
/// All credentials are resolved here, from the environment variables the
/// configuration names. A missing variable fails startup rather than the
/// first request that needs it.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(config.http.timeout_secs);

    let registry = ProviderRegistry::from_config(&config.providers, timeout)?;
    if registry.ids().is_empty() {
        tracing::warn!("No providers configured; every recognition request will be rejected");
    }

    let access_token = std::env::var(&config.imagery.access_token_env).map_err(|_| {
        DomainError::configuration(format!(
            "Imagery lookup requires the {} environment variable",
            config.imagery.access_token_env
        ))
    })?;
    let acquirer = MapillaryAcquirer::new(&config.imagery.graph_base_url, access_token, timeout)?;

    let prompts = PromptCatalog::new(
        config.prompts.recognize.clone(),
        config.prompts.validate.clone(),
    );

    let relay = RelayService::new(
        registry,
        Arc::new(acquirer),
        prompts,
        config.reconcile.provider.clone(),
    );

    Ok(AppState::new(Arc::new(relay)))
}
