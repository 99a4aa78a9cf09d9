use base64::Engine;
use bytes::Bytes;

/// Raw image bytes with their declared media type.
///
/// Request-scoped: created from an upload or a download and discarded once
/// the outbound provider call completes.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    bytes: Bytes,
    media_type: String,
}

impl ImageBlob {
    pub fn new(bytes: Bytes, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 payload of the image bytes
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:<media_type>;base64,<payload>` URI for inline transmission
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64())
    }
}

/// Sniff a media type from magic bytes. Returns `None` when unrecognized.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        let blob = ImageBlob::new(Bytes::from_static(b"hello"), "image/jpeg");
        assert_eq!(blob.data_uri(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_sniff_jpeg() {
        assert_eq!(
            sniff_media_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_sniff_png() {
        assert_eq!(
            sniff_media_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some("image/png")
        );
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(sniff_media_type(b"not an image"), None);
    }
}
