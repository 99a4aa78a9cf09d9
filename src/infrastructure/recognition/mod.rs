//! Recognition and reconciliation orchestration

mod service;

pub use service::RelayService;
