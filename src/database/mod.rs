//! Postgres pool setup and migrations.

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::DbConfig;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Connects to the configured database and runs the pending migrations.
    pub async fn init(db_config: &DbConfig) -> DbResult<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(2))
            .connect_with(db_config.connection_options())
            .await
            .map_err(DbError::FailToCreatePool)?;

        info!("{:<20} - Running migrations", "init_db");
        sqlx::migrate!("./migrations").run(&db_pool).await?;

        Ok(Self { db: db_pool })
    }

    /// Creates a fresh database named after `db_config.db_name`, then initializes it like `init`.
    pub async fn configure_for_test(db_config: &DbConfig) -> DbResult<Self> {
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;
        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        Self::init(db_config).await
    }

    pub fn into_pool(self) -> PgPool {
        self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type DbResult<T> = core::result::Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(sqlx::Error),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
