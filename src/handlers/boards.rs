// Board handlers
// HTTP handlers for board post operations

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use super::AppState;
use crate::{
    error::ApiError,
    models::board::{CreateBoardRequest, UpdateBoardRequest},
};

/// Parse a path segment into a board id
fn parse_board_id(raw: &str) -> Result<i32, ApiError> {
    let id = raw
        .parse::<i32>()
        .map_err(|_| ApiError::invalid_argument(format!("Board id must be an integer: {}", raw)))?;

    if id <= 0 {
        return Err(ApiError::invalid_argument("Board id must be positive"));
    }

    Ok(id)
}

/// Malformed JSON bodies are invalid arguments
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_argument(rejection.body_text()))
}

/// Create a new board post
/// POST /api/boards
pub async fn create_board(
    State(repo): State<AppState>,
    payload: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    info!("Creating new board post by: {} with title: {}", request.name, request.title);

    request.validate()?;
    let board = repo.create_board(request).await?;

    info!("Successfully created board with id: {}", board.id());
    Ok((StatusCode::CREATED, Json(board)))
}

/// Get board post by ID
/// GET /api/boards/:id
pub async fn get_board_by_id(
    State(repo): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_board_id(&raw_id)?;
    info!("Fetching board with id: {}", id);

    let board = repo.get_board_by_id(id).await?;

    Ok((StatusCode::OK, Json(board)))
}

/// Get all board posts, newest first
/// GET /api/boards
pub async fn get_all_boards(
    State(repo): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all boards");

    let boards = repo.get_all_boards().await?;

    info!("Retrieved {} boards", boards.len());
    Ok((StatusCode::OK, Json(boards)))
}

/// Update board post by ID
/// PUT /api/boards/:id
pub async fn update_board(
    State(repo): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateBoardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_board_id(&raw_id)?;
    let request = json_body(payload)?;
    info!("Updating board with id: {}", id);

    if request.is_empty() {
        return Err(ApiError::invalid_argument("No fields to update"));
    }
    request.validate()?;

    let board = repo.update_board(id, request).await?;

    info!("Successfully updated board with id: {}", id);
    Ok((StatusCode::OK, Json(board)))
}

/// Delete board post by ID
/// DELETE /api/boards/:id
pub async fn delete_board(
    State(repo): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_board_id(&raw_id)?;
    info!("Deleting board with id: {}", id);

    repo.delete_board(id).await?;

    info!("Successfully deleted board with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
