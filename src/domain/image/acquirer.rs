use async_trait::async_trait;
use std::fmt::Debug;

use super::{sniff_media_type, ImageBlob, ImageSource};
use crate::domain::DomainError;

const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// Produces image bytes from either an upload or an external identifier.
#[async_trait]
pub trait ImageAcquirer: Send + Sync + Debug {
    async fn acquire(&self, source: ImageSource) -> Result<ImageBlob, DomainError>;
}

/// Turn uploaded bytes into a blob, resolving the media type from the
/// declared content type, the file name, or the magic bytes, in that order.
pub fn blob_from_upload(
    bytes: bytes::Bytes,
    media_type: Option<String>,
    file_name: Option<String>,
) -> Result<ImageBlob, DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::input("No image payload provided"));
    }

    let media_type = media_type
        .filter(|m| m.starts_with("image/"))
        .or_else(|| {
            file_name.as_deref().and_then(|name| {
                mime_guess::from_path(name)
                    .first()
                    .filter(|m| m.type_() == mime_guess::mime::IMAGE)
                    .map(|m| m.essence_str().to_string())
            })
        })
        .or_else(|| sniff_media_type(&bytes).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

    Ok(ImageBlob::new(bytes, media_type))
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use bytes::Bytes;

    #[derive(Debug, Default)]
    pub struct MockImageAcquirer {
        blob: Option<ImageBlob>,
        error: Option<String>,
    }

    impl MockImageAcquirer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_blob(mut self, bytes: &'static [u8], media_type: &str) -> Self {
            self.blob = Some(ImageBlob::new(Bytes::from_static(bytes), media_type));
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl ImageAcquirer for MockImageAcquirer {
        async fn acquire(&self, source: ImageSource) -> Result<ImageBlob, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::upstream("mock-imagery", error));
            }

            match source {
                ImageSource::Upload {
                    bytes,
                    media_type,
                    file_name,
                } => blob_from_upload(bytes, media_type, file_name),
                ImageSource::External { .. } => self.blob.clone().ok_or_else(|| {
                    DomainError::upstream("mock-imagery", "No mock blob configured")
                }),
            }
        }
    }
}
