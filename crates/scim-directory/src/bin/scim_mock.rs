//! Serves a mock SCIM user directory over HTTP.
//!
//! Usage:
//!   scim-mock [--port 8080] [--store-path users.json] [--token SECRET] ...
//!
//! Every flag can also be set from the environment; see `--help`.

use clap::Parser;
use scim_directory::{server, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    server::run(config).await
}
