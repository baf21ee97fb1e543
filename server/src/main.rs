use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ClientService, SqliteClientStore};
use client_server::{logging, AppState, CliArgs};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    logging::init()?;

    let store = SqliteClientStore::open(&cli_args.db_path)
        .with_context(|| format!("Failed to open client store at {:?}", cli_args.db_path))?;
    let service: ClientService = ClientService::new(Arc::new(store));
    let state = AppState::new(service, cli_args.server_config());

    let addr = cli_args.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "Listening on {} (allowed origin {:?})",
        addr, cli_args.allowed_origin
    );

    client_server::run(listener, state).await?;
    info!("Server stopped");
    Ok(())
}
