//! Startup sequence: connect storage, sync schema, bring modules up, serve.

use std::fmt;

use anyhow::Context;
use axum::Router;

use biblioteca_db::Database;
use biblioteca_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Bootstrap phase, reported in startup logs.
///
/// `Serving` is only reached once the database is connected and the schema
/// is in sync; `Failed` is terminal and no socket is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Serving,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initializing => "initializing",
            Phase::Serving => "serving",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A fully initialized application, ready to serve.
pub struct Application {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect to the configured database and initialize every module.
    pub async fn initialize(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::connect(&settings.database)
            .await
            .with_context(|| format!("failed to connect to database '{}'", settings.database.url))?;

        Self::with_database(settings, db).await
    }

    /// Initialize modules over an already open database.
    pub async fn with_database(settings: Settings, db: Database) -> anyhow::Result<Self> {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &db);

        let migrations = registry.collect_migrations();
        db.sync_schema(&migrations)
            .await
            .context("failed to sync database schema")?;

        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        registry.init_modules(&ctx).await?;
        registry.start_modules(&ctx).await?;

        Ok(Self {
            settings,
            db,
            registry,
        })
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn router(&self) -> Router {
        biblioteca_http::build_router(&self.registry, &self.settings)
    }

    /// Bind, serve until shutdown, then stop modules and close the pool.
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = self.router();
        let listener = biblioteca_http::bind(&self.settings).await?;

        tracing::info!(phase = %Phase::Serving, "biblioteca ready");
        let served = biblioteca_http::serve(listener, router).await;

        self.registry.stop_modules().await?;
        self.db.close().await;

        served
    }
}

/// Run the service to completion.
///
/// A storage failure during initialization is logged and returned without
/// opening the listening socket.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(phase = %Phase::Initializing, "biblioteca bootstrap starting");

    let app = match Application::initialize(settings).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(phase = %Phase::Failed, error = ?e, "startup aborted");
            return Err(e);
        }
    };

    app.serve().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialization_fails_without_reachable_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.database.url = format!(
            "sqlite://{}",
            dir.path().join("missing").join("biblioteca.sqlite").display()
        );

        let result = Application::initialize(settings).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn initialization_registers_livros_and_creates_schema() {
        let db = Database::connect_in_memory().await.unwrap();

        let app = Application::with_database(Settings::default(), db.clone())
            .await
            .unwrap();

        assert!(app.registry().get_module("livros").is_some());
        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'livros'")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn phases_display_lowercase() {
        assert_eq!(Phase::Initializing.to_string(), "initializing");
        assert_eq!(Phase::Serving.to_string(), "serving");
        assert_eq!(Phase::Failed.to_string(), "failed");
    }
}
