//! Photo file-type checks and object key generation.

use std::fmt;

use crate::error::{UploadError, UploadResult};

/// Photo extensions accepted for upload, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Lowercased suffix after the last `.`, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether the filename carries an allowed photo extension.
pub fn is_allowed(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Storage key of an uploaded photo: `<folder><uuid>.<ext>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Generate a fresh key for `filename` under `folder`.
    pub fn generate(folder: &str, filename: &str) -> UploadResult<Self> {
        let ext = extension_of(filename)
            .filter(|_| is_allowed(filename))
            .ok_or_else(|| UploadError::UnsupportedExtension {
                filename: filename.to_string(),
            })?;
        Ok(Self(format!("{folder}{}.{ext}", uuid::Uuid::new_v4())))
    }

    /// Wrap an existing key without validation.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
