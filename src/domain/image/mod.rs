//! Image acquisition types: blobs, sources, and the acquirer trait

mod acquirer;
mod blob;
mod source;

pub use acquirer::{blob_from_upload, ImageAcquirer};
pub use blob::{sniff_media_type, ImageBlob};
pub use source::ImageSource;

#[cfg(test)]
pub use acquirer::mock;
