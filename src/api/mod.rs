//! HTTP layer: routes, handlers, request/response types

pub mod health;
pub mod recognize;
pub mod reconcile;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
