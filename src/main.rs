//! shotscene CLI entrypoint

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shotscene::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env into the process environment (CLI only; the library takes explicit config)
    let _ = dotenvy::dotenv();

    // Initialize tracing on stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse and execute CLI
    let cli = Cli::parse();
    cli.execute().await
}
