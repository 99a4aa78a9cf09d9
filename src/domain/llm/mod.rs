//! Provider-neutral chat types and the gateway trait

mod message;
mod provider;
mod request;
mod response;

pub use message::{ContentPart, Message, MessageRole};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};
pub use response::{FinishReason, LlmResponse, Usage};

#[cfg(test)]
pub use provider::mock;
