//! Infrastructure: provider implementations, imagery access, orchestration

pub mod imagery;
pub mod llm;
pub mod logging;
pub mod recognition;
