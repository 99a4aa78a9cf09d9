//! Reconciliation endpoint handler

use axum::extract::State;
use tracing::info;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse, ReconcileRequest};

/// POST /reconcile
///
/// Cross-checks two prior recognition answers with a text-only call to the
/// configured validator provider.
pub async fn reconcile(
    State(state): State<AppState>,
    Json(body): Json<ReconcileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let first = body
        .first_result
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("firstResult is required"))?;
    let second = body
        .second_result
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("secondResult is required"))?;
    let locale = body
        .locale
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("locale is required"))?;

    info!(request_id = %request_id, "Processing reconciliation request");

    let message = state.relay.reconcile(first, second, locale).await?;

    Ok(Json(MessageResponse { message }))
}
