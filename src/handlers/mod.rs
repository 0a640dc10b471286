// Handlers module
// HTTP handlers for the REST API

pub mod boards;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::{db::BoardRepository, error::ApiError};

/// Shared handler state: the configured board storage backend
pub type AppState = Arc<dyn BoardRepository>;

/// Health check handler
/// Returns "OK" with 200 status once the storage backend answers
pub async fn health_check(State(repo): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    repo.health_check().await?;
    Ok((StatusCode::OK, "OK"))
}
