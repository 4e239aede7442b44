//! Console server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Credentials and location of the image bucket
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_access_key: String,
}

/// Console server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// SQLite database file
    pub database_path: String,
    /// Secret used to sign session and link tokens
    pub jwt_secret: String,
    /// Name of the session cookie set on login
    pub session_cookie_name: String,
    /// Session lifetime
    pub session_ttl_hours: i64,
    /// Public base URL used in emailed links
    pub app_base_url: String,
    /// Image bucket; `None` when any credential is missing
    pub s3: Option<S3Config>,
    /// SES sender address; `None` logs mails instead of sending them
    pub ses_from_email: Option<String>,
    /// Per-file ceiling for uploaded images
    pub max_image_bytes: usize,
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
    /// Directory for the daily rolling log file
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                tracing::warn!("{name} not set, using development fallback");
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// All four S3 variables or nothing
    fn s3_from_env() -> Option<S3Config> {
        Some(S3Config {
            bucket: Self::optional("S3_BUCKETNAME")?,
            region: Self::optional("S3_REGION")?,
            access_key: Self::optional("S3_ACCESS_KEY")?,
            secret_access_key: Self::optional("S3_SECRET_ACCESS_KEY")?,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/console.db".into()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            session_cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "console-admin-session".into()),
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(24),
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            s3: Self::s3_from_env(),
            ses_from_email: Self::optional("SES_FROM_EMAIL"),
            max_image_bytes: std::env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: Self::optional("LOG_DIR"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Development defaults, no bucket and no mail sender
impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 3000,
            database_path: "data/console.db".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            session_cookie_name: "console-admin-session".into(),
            session_ttl_hours: 24,
            app_base_url: "http://localhost:3000".into(),
            s3: None,
            ses_from_email: None,
            max_image_bytes: 5 * 1024 * 1024,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}
