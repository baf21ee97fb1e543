//! Process configuration.
//!
//! Everything is read once from the command line (or the matching environment
//! variables) before the listener binds. `ServerConfig` is the slice that
//! travels with the router state.

use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;

use crate::requests_logging::RequestsLoggingLevel;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

// A single concrete origin; the `*` wildcard is not a valid allow-list entry.
fn parse_origin(s: &str) -> Result<HeaderValue, String> {
    if s.trim() == "*" {
        return Err("expected a single origin such as http://localhost:3000, not '*'".to_string());
    }
    HeaderValue::from_str(s).map_err(|err| format!("invalid origin {:?}: {}", s, err))
}

#[derive(Parser, Debug)]
#[clap(name = "client-server", about = "REST API to manage clients")]
pub struct CliArgs {
    /// Path to the SQLite database file holding the clients. `:memory:` keeps
    /// everything in memory for the lifetime of the process.
    #[clap(long, env = "CLIENTS_DB_PATH", default_value = "clients.db")]
    pub db_path: PathBuf,

    /// The interface to listen on.
    #[clap(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// The only origin allowed to make cross-origin requests.
    #[clap(
        long,
        env = "ALLOWED_ORIGIN",
        default_value = DEFAULT_ALLOWED_ORIGIN,
        value_parser = parse_origin
    )]
    pub allowed_origin: HeaderValue,

    /// The level of logging to perform on each request.
    #[clap(long, env = "REQUESTS_LOGGING_LEVEL", default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

impl CliArgs {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level,
            allowed_origin: self.allowed_origin.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub allowed_origin: HeaderValue,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::default(),
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
        }
    }
}
