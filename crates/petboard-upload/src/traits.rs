use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UploadResult;
use crate::key::extension_of;

/// A photo received from the creation form, buffered in full.
///
/// Uploaders always send `data` from its first byte, so a buffer that was
/// inspected during validation is still sent whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl PhotoUpload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Lowercased filename extension.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.filename)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Stores a photo remotely and returns its public URL.
#[async_trait]
pub trait PhotoUploader: Send + Sync {
    async fn upload(&self, photo: &PhotoUpload) -> UploadResult<String>;
}
