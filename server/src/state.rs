use std::env;
use std::sync::Arc;

use color_eyre::eyre::{eyre, WrapErr};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::AuthConfig;
use crate::media::{MediaHost, MediaHostConfig};

/// Image shown for products created without one
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub domain: String,
    pub protocol: String,
    pub media: MediaHost,
    pub auth: Arc<AuthConfig>,
    pub placeholder_image_url: String,
}

impl AppState {
    pub async fn from_env() -> crate::Result<Self> {
        let pool = setup_db_pool().await?;

        let client = reqwest::ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .wrap_err("Failed to build the HTTP client")?;

        let media = MediaHost::new(MediaHostConfig::from_env()?, client);
        let auth = AuthConfig::from_env()?;

        let domain = env::var("DOMAIN").unwrap_or_else(|_| "localhost:3000".to_string());
        let protocol = env::var("PROTO").unwrap_or_else(|_| "https".to_string());
        tracing::info!("DOMAIN: {}://{}", protocol, domain);

        Ok(Self {
            db: pool,
            domain,
            protocol,
            media,
            auth: Arc::new(auth),
            placeholder_image_url: env::var("PLACEHOLDER_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()),
        })
    }

    /// Git SHA the binary was built from
    pub fn version(&self) -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    /// Absolute URL for a path on this site
    pub fn url(&self, path: &str) -> String {
        format!("{}://{}{}", self.protocol, self.domain, path)
    }
}

#[tracing::instrument(err)]
pub async fn setup_db_pool() -> crate::Result<PgPool> {
    const MIGRATION_LOCK_ID: i64 = 0xDB_DB_DB_DB_DB_DB_DB;

    let database_url =
        env::var("DATABASE_URL").map_err(|_| eyre!("DATABASE_URL must be set"))?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .wrap_err("Failed to connect to the database")?;

    // Several instances may boot at once; only one runs migrations at a time.
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_ID)
        .execute(&pool)
        .await?;

    sqlx::migrate!("../migrations").run(&pool).await?;

    let unlocked: Option<bool> = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_ID)
        .fetch_one(&pool)
        .await?;

    match unlocked {
        Some(true) => tracing::info!("Migration lock unlocked"),
        Some(false) => tracing::info!("Failed to unlock migration lock"),
        None => return Err(eyre!("Failed to unlock migration lock")),
    }

    Ok(pool)
}
