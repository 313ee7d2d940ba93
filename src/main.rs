use std::path::PathBuf;

use clap::Parser;

use bikeshop::{config, lifecycle::startup, observability};

#[derive(Parser)]
#[command(name = "bikeshop", version, about = "Bike catalog service")]
struct Args {
    /// TOML config file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// Telemetry is installed before the runtime exists: the OTLP exporter owns a
// blocking HTTP client, which must not be built inside an async context.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = config::load_or_default(args.config.as_deref())?;
    let telemetry = observability::init(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bikeshop starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.path,
        request_timeout_secs = config.timeouts.request_secs,
        tracing_enabled = config.observability.tracing_enabled,
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(startup::run(config));
    drop(runtime);

    match &result {
        Ok(()) => tracing::info!("Shutdown complete"),
        Err(e) => tracing::error!(error = %e, "Service failed"),
    }
    telemetry.shutdown();

    Ok(result?)
}
