//! Route table and handlers for the client API.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use client_core::{Client, ClientDraft, ClientId};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::debug;

use crate::error::ApiError;
use crate::requests_logging::log_requests;
use crate::state::AppState;

pub const GREETING: &str = "Welcome! This is the index page of the API to manage clients";

#[derive(Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.allowed_origin.clone());
    Router::new()
        .route("/", get(index))
        .route("/clients", get(list_clients).post(add_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        // Last layer runs first, so preflights answered by CORS are logged too.
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

// Only a matching Origin gets the allow header back.
fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn index() -> Json<Greeting> {
    Json(Greeting {
        message: GREETING.to_string(),
    })
}

async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.service.list_clients()?))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<Json<Client>, ApiError> {
    state
        .service
        .get_client(id)?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn add_client(
    State(state): State<AppState>,
    Json(draft): Json<ClientDraft>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(state.service.add_client(draft)?))
}

// Absent ids are a silent no-op: the call never creates a record.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    Json(draft): Json<ClientDraft>,
) -> Result<StatusCode, ApiError> {
    if !state.service.update_client(id, &draft)? {
        debug!("PUT on missing client {} ignored", id);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_client(id)?;
    Ok(StatusCode::NO_CONTENT)
}
