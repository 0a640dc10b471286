use axum::{
    routing::get,
    Router,
};
use std::time::Duration;

use crate::{
    handlers::{
        boards::{create_board, delete_board, get_all_boards, get_board_by_id, update_board},
        health_check, AppState,
    },
    middleware::create_middleware_stack,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Board post endpoints
        .route("/api/boards", get(get_all_boards).post(create_board))
        .route(
            "/api/boards/:id",
            get(get_board_by_id).put(update_board).delete(delete_board),
        )
        // Add shared state (board storage)
        .with_state(state)
        // Apply middleware stack
        .layer(create_middleware_stack(request_timeout))
}
