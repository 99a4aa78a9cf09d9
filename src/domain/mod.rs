//! Domain types: errors, chat messages, image acquisition, prompt templates

mod error;

pub mod image;
pub mod llm;
pub mod prompt;

pub use error::DomainError;
pub use image::{ImageAcquirer, ImageBlob, ImageSource};
pub use llm::{ContentPart, LlmProvider, LlmRequest, LlmResponse, Message};
pub use prompt::PromptCatalog;
