//! Application state for console-server

use std::sync::Arc;

use aws_sdk_sesv2::Client as SesClient;
use sqlx::SqlitePool;

use crate::catalog::ImagePolicy;
use crate::config::Config;
use crate::db::DbService;
use crate::email::{LogMailer, Mailer, SesMailer};
use crate::storage::{ObjectStore, S3ObjectStore, StorageError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
///
/// Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Image bucket; `None` when the S3 credentials are incomplete
    pub storage: Option<Arc<dyn ObjectStore>>,
    /// Outbound mail (SES, or the log when no sender is configured)
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
    pub image_policy: ImagePolicy,
}

impl AppState {
    /// Open the database and build the external clients from `config`
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;

        let storage = match &config.s3 {
            Some(s3) => {
                tracing::info!(bucket = %s3.bucket, region = %s3.region, "Image bucket configured");
                Some(Arc::new(S3ObjectStore::new(s3)) as Arc<dyn ObjectStore>)
            }
            None => {
                tracing::warn!("S3 credentials incomplete, image uploads are disabled");
                None
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.ses_from_email {
            Some(from) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                Arc::new(SesMailer::new(SesClient::new(&aws_config), from.clone()))
            }
            None => {
                tracing::warn!("SES_FROM_EMAIL not set, emails are written to the log");
                Arc::new(LogMailer)
            }
        };

        Ok(Self::from_parts(db.pool, storage, mailer, config))
    }

    pub fn from_parts(
        pool: SqlitePool,
        storage: Option<Arc<dyn ObjectStore>>,
        mailer: Arc<dyn Mailer>,
        config: Config,
    ) -> Self {
        Self {
            pool,
            storage,
            mailer,
            image_policy: ImagePolicy::new(config.max_image_bytes),
            config: Arc::new(config),
        }
    }

    /// The image bucket, or the missing-credential error
    pub fn storage(&self) -> Result<&dyn ObjectStore, StorageError> {
        self.storage.as_deref().ok_or(StorageError::NotConfigured)
    }
}
