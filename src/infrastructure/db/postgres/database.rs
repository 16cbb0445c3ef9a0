use crate::infrastructure::db::database::{Database, DatabaseError};
use async_trait::async_trait;
use sqlx::postgres::{PgListener, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a dedicated LISTEN connection subscribed to `channel`.
    pub async fn listen(&self, channel: &str) -> Result<PgListener, DatabaseError> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| DatabaseError::Listener(e.to_string()))?;
        listener
            .listen(channel)
            .await
            .map_err(|e| DatabaseError::Listener(e.to_string()))?;
        Ok(listener)
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn execute(&self, query: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::PostgresDatabase;
    use crate::infrastructure::db::database::Database;

    fn test_db_url() -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }

    #[tokio::test]
    async fn given_valid_database_url_when_execute_should_succeed() {
        let Some(url) = test_db_url() else {
            return;
        };
        let db = PostgresDatabase::connect(&url, 2).await.unwrap();

        assert!(db.execute("SELECT 1").await.is_ok());
    }

    #[tokio::test]
    async fn given_valid_database_url_when_listen_should_subscribe() {
        let Some(url) = test_db_url() else {
            return;
        };
        let db = PostgresDatabase::connect(&url, 2).await.unwrap();

        assert!(db.listen("garage_desk_changes").await.is_ok());
    }
}
