use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Errors from photo uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type: {filename}")]
    UnsupportedExtension { filename: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("object storage returned {status}: {message}")]
    Service { status: u16, message: String },
}

impl<E> From<SdkError<E, HttpResponse>> for UploadError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    fn from(e: SdkError<E, HttpResponse>) -> Self {
        let status = e.raw_response().map(|r| r.status().as_u16());
        match (status, e.as_service_error()) {
            (Some(status), Some(service)) => Self::Service {
                status,
                message: service
                    .message()
                    .or(service.code())
                    .unwrap_or("request failed")
                    .to_string(),
            },
            _ => Self::Transport(DisplayErrorContext(&e).to_string()),
        }
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
