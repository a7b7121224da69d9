use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::models::{CoverLetter, Question, Stored, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A record type that lives in one of the store's collections.
pub trait Collection: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: &'static str;
}

impl Collection for CoverLetter {
    const TABLE: &'static str = "coverLetter";
}

impl Collection for Question {
    const TABLE: &'static str = "questions";
}

impl Collection for UserProfile {
    const TABLE: &'static str = "users";
}

/// Durable async CRUD over the three collections. Each mutation runs in its
/// own transaction scoped to exactly one collection; there is no
/// cross-collection atomicity and no rollback path exposed to callers.
#[derive(Clone)]
pub struct EntityStore {
    pool: SqlitePool,
}

impl EntityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new record and returns the store-assigned id.
    pub async fn add<C: Collection>(&self, record: &C) -> Result<i64, StoreError> {
        let data = serde_json::to_string(record)?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&format!(r#"INSERT INTO "{}" (data) VALUES (?1)"#, C::TABLE))
            .bind(&data)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let id = result.last_insert_rowid();
        debug!("added record {id} to {}", C::TABLE);
        Ok(id)
    }

    /// Returns every record in the collection. No ordering guarantee is
    /// made; callers sort if order matters.
    pub async fn get_all<C: Collection>(&self) -> Result<Vec<Stored<C>>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as(&format!(r#"SELECT id, data FROM "{}""#, C::TABLE))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(id, data)| Ok(Stored::new(id, serde_json::from_str(&data)?)))
            .collect()
    }

    /// Inserts or fully replaces the record with the given id. Not a merge:
    /// the supplied record overwrites whatever was stored.
    pub async fn put<C: Collection>(&self, stored: &Stored<C>) -> Result<(), StoreError> {
        let data = serde_json::to_string(&stored.record)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            r#"INSERT OR REPLACE INTO "{}" (id, data) VALUES (?1, ?2)"#,
            C::TABLE
        ))
        .bind(stored.id)
        .bind(&data)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!("put record {} in {}", stored.id, C::TABLE);
        Ok(())
    }

    /// Removes the record with that id. A no-op, not an error, if absent.
    pub async fn delete<C: Collection>(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(r#"DELETE FROM "{}" WHERE id = ?1"#, C::TABLE))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!("deleted record {id} from {}", C::TABLE);
        Ok(())
    }
}
