//! LLM provider implementations and the config-keyed registry

mod anthropic;
pub mod http_client;
mod openai_compat;
mod registry;

pub use anthropic::AnthropicProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai_compat::OpenAiCompatProvider;
pub use registry::{ProviderConfig, ProviderHandle, ProviderRegistry};
