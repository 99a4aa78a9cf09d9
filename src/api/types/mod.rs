mod error;
mod json;

use serde::{Deserialize, Serialize};

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;

/// Success envelope: `{"message": "<provider's raw answer>"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// JSON body for identifier-based recognition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeJsonRequest {
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// JSON body for reconciliation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    #[serde(default)]
    pub first_result: Option<String>,
    #[serde(default)]
    pub second_result: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}
