//! Instruction templates for recognition and validation tasks

mod catalog;
mod template;

pub use catalog::{PromptCatalog, DEFAULT_RECOGNIZE_TEMPLATE, DEFAULT_VALIDATE_TEMPLATE};
pub use template::{PromptTemplate, TemplateError};
