//! HTTP layer of the client service.
//!
//! # Design
//! - Routes are registered explicitly in `routes::router`; the service is
//!   handed in through `AppState` by whoever starts the server.
//! - Handlers hold no state between requests. The only shared resource is the
//!   store connection behind the service.

pub mod config;
mod error;
pub mod logging;
mod requests_logging;
mod routes;
mod state;

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

pub use config::{CliArgs, ServerConfig};
pub use error::ApiError;
pub use requests_logging::RequestsLoggingLevel;
pub use routes::{Greeting, GREETING};
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

/// Serves until Ctrl-C or SIGTERM.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    run_until(listener, state, shutdown_signal()).await
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn run_until<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
