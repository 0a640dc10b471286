use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{error, info, warn};

use super::{board_not_found, BoardRepository};
use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::board::{Board, CreateBoardRequest, UpdateBoardRequest};

/// PostgreSQL-backed board repository holding a Deadpool connection pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the connection pool and verify connectivity before returning.
    ///
    /// # Arguments
    /// * `config` - The database configuration
    ///
    /// # Returns
    /// * `Result<Self, ApiError>` - Database instance or error
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        if let Some(url) = config.connection_string {
            pg_config.url = Some(url);
        } else {
            pg_config.host = Some(config.host);
            pg_config.port = Some(config.port);
            pg_config.dbname = Some(config.database);
            pg_config.user = Some(config.username);
            pg_config.password = Some(config.password);

            pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
                "disable" => deadpool_postgres::SslMode::Disable,
                "prefer" => deadpool_postgres::SslMode::Prefer,
                "require" => deadpool_postgres::SslMode::Require,
                other => {
                    warn!("SSL mode '{}' not supported by the pool, defaulting to 'require'", other);
                    deadpool_postgres::SslMode::Require
                }
            });
        }

        pg_config.connect_timeout = Some(config.connection_timeout);
        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });
        pg_config.pool = Some(deadpool_postgres::PoolConfig::new(config.max_connections as usize));

        let tls_connector = TlsConnector::builder()
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Database(format!("TLS connector creation failed: {}", e))
            })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Create the `boards` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let boards_table = r#"
            CREATE TABLE IF NOT EXISTS boards (
                id SERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                title VARCHAR(200) NOT NULL,
                content TEXT NOT NULL
            )
        "#;

        client.execute(boards_table, &[])
            .await
            .map_err(|e| {
                error!("Failed to create boards table: {}", e);
                ApiError::Database(format!("Boards table creation failed: {}", e))
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::Database(format!("Connection test failed: {}", e))
            })?;

        info!("Database connection test successful");
        Ok(())
    }

    fn row_to_board(row: &Row) -> Board {
        Board::new(row.get(0), row.get(1), row.get(2), row.get(3))
    }
}

#[async_trait]
impl BoardRepository for Database {
    async fn create_board(&self, request: CreateBoardRequest) -> Result<Board, ApiError> {
        // id comes from the SERIAL column
        let board = request.into_board(0);
        let client = self.get_connection().await?;

        let query = r#"
            INSERT INTO boards (name, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, name, title, content
        "#;

        let row = client.query_one(query, &[&board.name(), &board.title(), &board.content()])
            .await
            .map_err(ApiError::from)?;

        let created = Self::row_to_board(&row);
        info!("Created board with id: {}", created.id());
        Ok(created)
    }

    async fn get_board_by_id(&self, id: i32) -> Result<Board, ApiError> {
        let client = self.get_connection().await?;
        let query = "SELECT id, name, title, content FROM boards WHERE id = $1";

        let row = client.query_opt(query, &[&id])
            .await
            .map_err(ApiError::from)?;

        row.as_ref().map(Self::row_to_board).ok_or_else(|| board_not_found(id))
    }

    async fn get_all_boards(&self) -> Result<Vec<Board>, ApiError> {
        let client = self.get_connection().await?;
        let query = "SELECT id, name, title, content FROM boards ORDER BY id DESC";

        let rows = client.query(query, &[])
            .await
            .map_err(ApiError::from)?;

        Ok(rows.iter().map(Self::row_to_board).collect())
    }

    async fn update_board(&self, id: i32, request: UpdateBoardRequest) -> Result<Board, ApiError> {
        let client = self.get_connection().await?;

        // Build the SET clause from the supplied fields only
        let mut query_parts = Vec::new();
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = Vec::new();
        let mut param_count = 1;

        let normalized_name = request.get_normalized_name();
        let normalized_title = request.get_normalized_title();

        if let Some(ref name) = normalized_name {
            query_parts.push(format!("name = ${}", param_count));
            params.push(name);
            param_count += 1;
        }

        if let Some(ref title) = normalized_title {
            query_parts.push(format!("title = ${}", param_count));
            params.push(title);
            param_count += 1;
        }

        if let Some(ref content) = request.content {
            query_parts.push(format!("content = ${}", param_count));
            params.push(content);
            param_count += 1;
        }

        if query_parts.is_empty() {
            return Err(ApiError::invalid_argument("No fields to update"));
        }

        params.push(&id);

        let query = format!(
            "UPDATE boards SET {} WHERE id = ${} RETURNING id, name, title, content",
            query_parts.join(", "),
            param_count
        );

        let row = client.query_opt(&query, &params)
            .await
            .map_err(ApiError::from)?;

        match row {
            Some(row) => {
                let updated = Self::row_to_board(&row);
                info!("Updated board with id: {}", updated.id());
                Ok(updated)
            }
            None => Err(board_not_found(id)),
        }
    }

    async fn delete_board(&self, id: i32) -> Result<(), ApiError> {
        let client = self.get_connection().await?;
        let query = "DELETE FROM boards WHERE id = $1";

        let rows_affected = client.execute(query, &[&id])
            .await
            .map_err(ApiError::from)?;

        if rows_affected == 0 {
            Err(board_not_found(id))
        } else {
            info!("Deleted board with id: {}", id);
            Ok(())
        }
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                ApiError::Database(format!("Health check failed: {}", e))
            })?;

        Ok(())
    }
}
