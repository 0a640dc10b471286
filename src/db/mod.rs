// Storage layer for board posts

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::board::{Board, CreateBoardRequest, UpdateBoardRequest};

pub use memory::InMemoryBoardRepository;
pub use postgres::Database;

/// Board storage backend.
///
/// Requests reaching a repository have already been validated by the handlers.
/// Lookups of an absent id fail with `ApiError::NoSuchElement`.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Store a new board post and return it with its assigned id
    async fn create_board(&self, request: CreateBoardRequest) -> Result<Board, ApiError>;

    async fn get_board_by_id(&self, id: i32) -> Result<Board, ApiError>;

    /// All board posts, newest (highest id) first
    async fn get_all_boards(&self) -> Result<Vec<Board>, ApiError>;

    /// Apply the supplied fields and return the updated post
    async fn update_board(&self, id: i32, request: UpdateBoardRequest) -> Result<Board, ApiError>;

    async fn delete_board(&self, id: i32) -> Result<(), ApiError>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<(), ApiError>;
}

pub(crate) fn board_not_found(id: i32) -> ApiError {
    ApiError::no_such_element(format!("Board with id {} not found", id))
}
