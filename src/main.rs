use anyhow::Context;
use biblioteca_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load biblioteca settings")?;

    biblioteca_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        port = settings.server.port,
        "biblioteca starting"
    );

    biblioteca::app::run(settings).await
}
