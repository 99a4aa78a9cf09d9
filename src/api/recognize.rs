//! Recognition endpoint handler

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
};
use tracing::info;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse, RecognizeJsonRequest};
use crate::domain::ImageSource;

/// POST /recognize/{provider_id}
///
/// Accepts either a multipart form (an `image` file part plus an optional
/// `locale` text part) or a JSON body `{"imageId": ..., "locale": ...}`
/// referencing an external photo identifier.
pub async fn recognize(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
    request: Request,
) -> Result<Json<MessageResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let (source, locale) = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?;
        extract_upload(multipart).await?
    } else {
        let Json(body) = Json::<RecognizeJsonRequest>::from_request(request, &())
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("Expected multipart image or JSON body: {rejection}"))
            })?;

        let image_id = body
            .image_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("imageId is required"))?;

        (ImageSource::external(image_id), body.locale)
    };

    info!(
        request_id = %request_id,
        provider_id = %provider_id,
        "Processing recognition request"
    );

    let message = state
        .relay
        .recognize(&provider_id, source, locale.as_deref())
        .await?;

    Ok(Json(MessageResponse { message }))
}

/// Pull the image part and optional locale out of a multipart form.
///
/// The image part is matched by field name (`image` or `file`); anything the
/// client declares beyond that is ignored.
async fn extract_upload(
    mut multipart: Multipart,
) -> Result<(ImageSource, Option<String>), ApiError> {
    let mut source: Option<ImageSource> = None;
    let mut locale: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("image") | Some("file") => {
                let media_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read image: {e}")))?;

                source = Some(ImageSource::Upload {
                    bytes,
                    media_type,
                    file_name,
                });
            }
            Some("locale") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read locale: {e}")))?;
                if !value.trim().is_empty() {
                    locale = Some(value);
                }
            }
            _ => {}
        }
    }

    let source = source.ok_or_else(|| ApiError::bad_request("No image payload provided"))?;
    Ok((source, locale))
}
