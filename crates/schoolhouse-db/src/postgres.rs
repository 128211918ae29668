//! PostgreSQL backend storing every collection in one JSONB table.
//!
//! See `migrations/` for the schema. Filters become `body @> $filter`, which
//! the GIN index on `body` serves.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{Collection, DocumentStore, Filter, StoreError, StoreResult};

static MIGRATOR: Migrator = sqlx::migrate!();

/// Unique indexes and the document field each one guards.
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[("documents_users_email_key", "email")];

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and applies pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        MIGRATOR.run(&pool).await?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool. Migrations are the caller's responsibility.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_write_error(collection: Collection, error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .and_then(|name| {
                    UNIQUE_CONSTRAINTS
                        .iter()
                        .find(|(constraint, _)| *constraint == name)
                        .map(|(_, field)| *field)
                })
                .unwrap_or("id");
            return StoreError::Duplicate { collection, field };
        }
    }
    StoreError::Database(error)
}

#[async_trait]
impl DocumentStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>> {
        let body = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(body)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>> {
        let bodies = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY created_at, id
            "#,
        )
        .bind(collection.as_str())
        .bind(filter.to_value())
        .fetch_all(&self.pool)
        .await?;

        Ok(bodies)
    }

    async fn insert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?;

        Ok(())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        document: Value,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents SET body = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(collection, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(collection, e))?;

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
