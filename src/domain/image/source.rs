use bytes::Bytes;

/// Where the image bytes come from. Exactly one variant per request.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bytes uploaded directly with the request
    Upload {
        bytes: Bytes,
        /// Content type declared by the client, if any
        media_type: Option<String>,
        /// File name from the multipart part, if any
        file_name: Option<String>,
    },
    /// Opaque identifier resolved through an external imagery service
    External { image_id: String },
}

impl ImageSource {
    pub fn upload(bytes: Bytes) -> Self {
        Self::Upload {
            bytes,
            media_type: None,
            file_name: None,
        }
    }

    pub fn external(image_id: impl Into<String>) -> Self {
        Self::External {
            image_id: image_id.into(),
        }
    }
}
