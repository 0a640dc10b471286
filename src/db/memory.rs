use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::{board_not_found, BoardRepository};
use crate::error::ApiError;
use crate::models::board::{Board, CreateBoardRequest, UpdateBoardRequest};

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    boards: BTreeMap<i32, Board>,
}

/// Process-local board storage for running without PostgreSQL.
/// Ids start at 1 and are never reused, matching a `SERIAL` column.
#[derive(Debug, Default)]
pub struct InMemoryBoardRepository {
    store: RwLock<Store>,
}

impl InMemoryBoardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn create_board(&self, request: CreateBoardRequest) -> Result<Board, ApiError> {
        let mut store = self.store.write().await;

        let id = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Board id sequence exhausted")))?;
        store.last_id = id;

        let board = request.into_board(id);
        store.boards.insert(id, board.clone());

        info!("Created board with id: {}", id);
        Ok(board)
    }

    async fn get_board_by_id(&self, id: i32) -> Result<Board, ApiError> {
        let store = self.store.read().await;
        store.boards.get(&id).cloned().ok_or_else(|| board_not_found(id))
    }

    async fn get_all_boards(&self) -> Result<Vec<Board>, ApiError> {
        let store = self.store.read().await;
        Ok(store.boards.values().rev().cloned().collect())
    }

    async fn update_board(&self, id: i32, request: UpdateBoardRequest) -> Result<Board, ApiError> {
        let mut store = self.store.write().await;
        let board = store.boards.get_mut(&id).ok_or_else(|| board_not_found(id))?;

        board.apply(request);

        info!("Updated board with id: {}", id);
        Ok(board.clone())
    }

    async fn delete_board(&self, id: i32) -> Result<(), ApiError> {
        let mut store = self.store.write().await;

        match store.boards.remove(&id) {
            Some(_) => {
                info!("Deleted board with id: {}", id);
                Ok(())
            }
            None => Err(board_not_found(id)),
        }
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
