use anyhow::Context;
use clap::{Parser, Subcommand};

use biblioteca_db::Database;
use biblioteca_kernel::{settings::Settings, ModuleRegistry};

#[derive(Debug, Parser)]
#[command(name = "biblioteca-cli", version, about = "Administrative commands for biblioteca")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect to the configured database and sync the schema of every module
    Migrate,
    /// Print the effective settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load biblioteca settings")?;
    biblioteca_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Migrate => migrate(&settings).await,
        Command::Config => print_config(&settings),
    }
}

async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let db = Database::connect(&settings.database)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.database.url))?;

    let mut registry = ModuleRegistry::new();
    biblioteca::modules::register_all(&mut registry, &db);

    let applied = db
        .sync_schema(&registry.collect_migrations())
        .await
        .context("failed to sync database schema")?;
    db.close().await;

    tracing::info!(applied, "schema sync complete");
    println!("{applied} schema migration(s) applied to {}", settings.database.url);
    Ok(())
}

fn print_config(settings: &Settings) -> anyhow::Result<()> {
    let rendered =
        serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    println!("{rendered}");
    Ok(())
}
