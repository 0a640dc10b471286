// Library root for the board API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use db::{BoardRepository, Database, InMemoryBoardRepository};
pub use error::{ApiError, ErrorResponse, FieldError, ValidationFailure};
pub use models::{Board, CreateBoardRequest, UpdateBoardRequest};
pub use routes::create_router;
