use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, instrument};

use super::{ProfileStore, StoreError};
use crate::config::DatabaseConfig;
use crate::constants::store::{PLATFORM_LABEL, STATUS_CREATED};
use crate::config::loader::redact_url_password;
use crate::models::{ProfileId, ProfileRecord};

const INSERT_PROFILE: &str = r#"
INSERT INTO profiles (
    id, platform, username, email, status_id, profile_url, created_at,
    avatar_url, cover_url, password_hash, salt, first_name, last_name
)
VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7, $8, $9, $10, $11, $12)
"#;

/// Postgres-backed store. Connections are checked out per save and returned
/// to the pool when the query future completes or is dropped.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Connect using the configured pool settings, applying migrations when enabled
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!(
            database = %redact_url_password(&config.url),
            max_connections = config.max_connections,
            "📊 STORE: Connecting to Postgres"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        if config.run_migrations {
            store.migrate().await?;
        }

        info!("✅ STORE: Postgres connection established");
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Query {
                operation: "migrate".to_string(),
                message: e.to_string(),
            })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    #[instrument(skip(self, record), fields(email = %record.email()))]
    async fn save(&self, record: ProfileRecord) -> Result<ProfileId, StoreError> {
        let id = ProfileId::new_v4();

        sqlx::query(INSERT_PROFILE)
            .bind(id.0)
            .bind(PLATFORM_LABEL)
            .bind(record.username())
            .bind(record.email())
            .bind(STATUS_CREATED)
            .bind(record.profile_url())
            .bind(record.avatar_url())
            .bind(record.cover_url())
            .bind(record.password_hash().as_str())
            .bind(record.salt().as_str())
            .bind(record.first_name())
            .bind(record.last_name())
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, record.email()))?;

        Ok(id)
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

fn classify(error: sqlx::Error, email: &str) -> StoreError {
    match error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StoreError::DuplicateEmail {
                email: email.to_string(),
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(error.to_string())
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => StoreError::Connection(error.to_string()),
        other => StoreError::Query {
            operation: "insert_profile".to_string(),
            message: other.to_string(),
        },
    }
}
