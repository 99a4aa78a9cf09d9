use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::image::{blob_from_upload, sniff_media_type, ImageAcquirer, ImageBlob, ImageSource};
use crate::domain::DomainError;

const SERVICE_NAME: &str = "mapillary";
const THUMB_FIELD: &str = "thumb_2048_url";

/// Resolves external image identifiers through the Mapillary Graph API and
/// downloads the image bytes.
///
/// Identifier-based acquisition makes exactly two outbound calls: the
/// metadata lookup and the download. Either hop failing fails the whole
/// acquisition; there are no retries.
#[derive(Debug)]
pub struct MapillaryAcquirer {
    client: reqwest::Client,
    graph_base_url: String,
    access_token: String,
}

impl MapillaryAcquirer {
    pub fn new(
        graph_base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            graph_base_url: graph_base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Look up the direct download URL for an image identifier.
    async fn resolve_download_url(&self, image_id: &str) -> Result<String, DomainError> {
        let url = format!(
            "{}/{}?fields={}&access_token={}",
            self.graph_base_url, image_id, THUMB_FIELD, self.access_token
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::upstream(SERVICE_NAME, format!("Lookup failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream(
                SERVICE_NAME,
                format!("Lookup returned HTTP {status}: {body}"),
            ));
        }

        let metadata: ImageMetadata = response.json().await.map_err(|e| {
            DomainError::upstream(SERVICE_NAME, format!("Failed to parse lookup response: {e}"))
        })?;

        metadata.thumb_2048_url.ok_or_else(|| {
            DomainError::upstream(
                SERVICE_NAME,
                format!("Lookup response for image {image_id} has no {THUMB_FIELD}"),
            )
        })
    }

    async fn download(&self, url: &str) -> Result<ImageBlob, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::upstream(SERVICE_NAME, format!("Download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DomainError::upstream(
                SERVICE_NAME,
                format!("Download returned HTTP {}", response.status()),
            ));
        }

        let declared = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::upstream(SERVICE_NAME, format!("Download failed: {e}")))?;

        if bytes.is_empty() {
            return Err(DomainError::upstream(SERVICE_NAME, "Downloaded image is empty"));
        }

        let media_type = declared
            .or_else(|| sniff_media_type(&bytes).map(str::to_string))
            .unwrap_or_else(|| "image/jpeg".to_string());

        Ok(ImageBlob::new(bytes, media_type))
    }
}

#[async_trait]
impl ImageAcquirer for MapillaryAcquirer {
    async fn acquire(&self, source: ImageSource) -> Result<ImageBlob, DomainError> {
        match source {
            ImageSource::Upload {
                bytes,
                media_type,
                file_name,
            } => blob_from_upload(bytes, media_type, file_name),
            ImageSource::External { image_id } => {
                let url = self.resolve_download_url(&image_id).await?;
                self.download(&url).await
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageMetadata {
    thumb_2048_url: Option<String>,
}
