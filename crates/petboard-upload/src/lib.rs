//! Photo uploads for petboard.
//!
//! Photos are stored in remote object storage under a generated key
//! `<folder><uuid>.<ext>`, and the record keeps the object's public URL.
//!
//! # Uploaders
//!
//! All uploaders implement the [`PhotoUploader`] trait:
//!
//! - [`S3Uploader`] -- `PutObject` through the AWS SDK, with credentials
//!   from the default provider chain
//! - [`InMemoryUploader`] -- records uploads in memory for tests
//!
//! A failed upload is an [`UploadError`]; callers must not create a record
//! when one is returned.

pub mod config;
pub mod error;
pub mod key;
pub mod memory;
pub mod s3;
pub mod traits;

pub use config::S3Config;
pub use error::{UploadError, UploadResult};
pub use key::{extension_of, is_allowed, ObjectKey, ALLOWED_EXTENSIONS};
pub use memory::InMemoryUploader;
pub use s3::S3Uploader;
pub use traits::{PhotoUpload, PhotoUploader};
