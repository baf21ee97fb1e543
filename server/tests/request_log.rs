//! What the request logging middleware writes, captured from tracing events.
//!
//! Each test installs its own thread-local subscriber, so lines logged by
//! concurrently running tests never mix.

use std::fmt;
use std::sync::{Arc, Mutex};

use axum::http::{self, Request, StatusCode};
use client_core::{ClientService, SqliteClientStore};
use client_server::{app, AppState, RequestsLoggingLevel, ServerConfig};
use tower::ServiceExt;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<String>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

fn preflight() -> Request<String> {
    Request::builder()
        .method("OPTIONS")
        .uri("/clients")
        .header(http::header::ORIGIN, "http://localhost:3000")
        .header(http::header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(String::new())
        .unwrap()
}

#[tokio::test]
async fn preflight_requests_are_logged() {
    for level in [RequestsLoggingLevel::Path, RequestsLoggingLevel::Headers] {
        let logs = CapturedLogs::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.clone()));

        let store = SqliteClientStore::open_in_memory().unwrap();
        let service: ClientService = ClientService::new(Arc::new(store));
        let app = app(AppState::new(
            service,
            ServerConfig {
                requests_logging_level: level,
                ..ServerConfig::default()
            },
        ));

        let resp = app.oneshot(preflight()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let lines = logs.lines();
        assert!(
            lines.iter().any(|l| l == ">>> OPTIONS /clients"),
            "{level:?}: {lines:?}"
        );
        assert!(
            lines.iter().any(|l| l.starts_with("<<< 200 OPTIONS /clients")),
            "{level:?}: {lines:?}"
        );

        let logged_origin = lines
            .iter()
            .any(|l| l == r#">>> origin: "http://localhost:3000""#);
        assert_eq!(logged_origin, level == RequestsLoggingLevel::Headers, "{lines:?}");
    }
}

#[tokio::test]
async fn no_lines_at_level_none() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.clone()));

    let service: ClientService =
        ClientService::new(Arc::new(SqliteClientStore::open_in_memory().unwrap()));
    let app = app(AppState::new(
        service,
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            ..ServerConfig::default()
        },
    ));

    let resp = app.oneshot(preflight()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        !logs.lines().iter().any(|l| l.starts_with(">>>") || l.starts_with("<<<")),
        "{:?}",
        logs.lines()
    );
}
