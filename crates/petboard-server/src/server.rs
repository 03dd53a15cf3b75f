use std::sync::Arc;

use petboard_store::JsonFileStore;
use petboard_upload::S3Uploader;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::flash::FlashKey;
use crate::router::build_router;
use crate::state::AppState;

/// Petboard web server.
pub struct PetboardServer {
    config: ServerConfig,
}

impl PetboardServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the persisted document and build the S3 uploader.
    ///
    /// Creates the document when it does not exist yet. AWS credentials are
    /// resolved lazily by the SDK on the first upload.
    pub async fn state(&self) -> ServerResult<AppState> {
        let store = JsonFileStore::open(&self.config.data_file)?;
        let uploader = S3Uploader::load(self.config.s3.clone()).await;
        Ok(
            AppState::new(Arc::new(store), Arc::new(uploader), FlashKey::from_env())
                .with_upload_limit(self.config.max_upload_bytes),
        )
    }

    /// Build the router (useful for testing).
    pub async fn router(&self) -> ServerResult<axum::Router> {
        Ok(build_router(self.state().await?))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router().await?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            data_file = %self.config.data_file.display(),
            bucket = %self.config.s3.bucket,
            "petboard listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
