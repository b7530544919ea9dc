//! SQLite client factory and schema sync for biblioteca.
//!
//! The [`Database`] handle is built once at startup and cloned into whatever
//! needs storage access. It wraps a `sqlx` pool, so clones share connections.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

pub mod error;
pub mod settings;

pub use error::StoreError;
pub use settings::DatabaseSettings;

/// Schema definition contributed by a module.
///
/// `up` must be idempotent (`CREATE ... IF NOT EXISTS`): every statement is
/// executed on each startup to bring the schema in sync.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Shared handle to the relational store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database described by `settings`, creating the file if needed.
    ///
    /// Any failure here is reported as [`StoreError::Connection`].
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .map_err(StoreError::Connection)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await
            .map_err(StoreError::Connection)?;

        tracing::info!(
            target: "biblioteca-db",
            url = %settings.url,
            max_connections = settings.max_connections,
            "database connection established"
        );

        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool is pinned to a single long-lived connection; every SQLite
    /// memory connection is its own database.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(StoreError::Connection)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::Connection)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a trivial statement to check the connection is usable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Execute every migration in order. Returns the number applied.
    pub async fn sync_schema(
        &self,
        migrations: &[(String, Migration)],
    ) -> Result<usize, StoreError> {
        for (module, migration) in migrations {
            tracing::info!(
                target: "biblioteca-db",
                module = %module,
                migration = migration.id,
                "syncing schema"
            );
            sqlx::raw_sql(migration.up).execute(&self.pool).await?;
        }

        Ok(migrations.len())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
