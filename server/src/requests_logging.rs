//! Request logging middleware

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::info;

use crate::state::AppState;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

pub async fn log_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let level = state.config.requests_logging_level;
    if level == RequestsLoggingLevel::None {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    info!(">>> {} {}", method, uri);
    if level >= RequestsLoggingLevel::Headers {
        for (name, value) in request.headers() {
            info!(">>> {}: {:?}", name, value);
        }
    }

    let response = next.run(request).await;

    info!(
        "<<< {} {} {} ({} ms)",
        response.status().as_u16(),
        method,
        uri,
        start.elapsed().as_millis()
    );
    response
}
