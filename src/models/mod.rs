// Models module

pub mod board;

// Re-export commonly used types
pub use board::{Board, CreateBoardRequest, UpdateBoardRequest};
