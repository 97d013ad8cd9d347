use anyhow::{Context, Result};
use wavescope::{logging, ServerConfig, WebServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional single argument: path to a TOML config file
    let config = match std::env::args_os().nth(1) {
        Some(path) => ServerConfig::load(&path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => ServerConfig::default(),
    };

    let _log_guard = logging::init(&config.log).context("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        upload_dir = %config.upload_dir.display(),
        static_dir = %config.static_dir.display(),
        artifact_naming = ?config.artifact_naming,
        "starting wavescope"
    );

    let server = WebServer::new(config).context("Failed to initialize server")?;
    server.run().await?;

    Ok(())
}
