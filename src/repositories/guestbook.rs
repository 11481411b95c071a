// src/repositories/guestbook.rs - Data access
use async_trait::async_trait;
use log::debug;
use sqlx::PgPool;

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::GuestbookEntry;

type Result<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait GuestbookRepositoryTrait {
    /// Saves a new guestbook entry and returns the stored row
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn save(&self, name: &str, message: &str) -> Result<GuestbookEntry>;

    /// Finds the most recent guestbook entries, newest first
    ///
    /// ### Arguments
    /// * `limit` - The maximum number of entries to return
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn find_recent(&self, limit: i64) -> Result<Vec<GuestbookEntry>>;
}

// Implementation using actual database
pub struct GuestbookRepository {
    pool: PgPool,
}

impl GuestbookRepository {
    pub fn new(db: Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }
}

#[async_trait]
impl GuestbookRepositoryTrait for GuestbookRepository {
    async fn save(&self, name: &str, message: &str) -> Result<GuestbookEntry> {
        let record = sqlx::query_as::<_, GuestbookEntry>(
            r#"
            INSERT INTO guestbook_entries (name, message)
            VALUES ($1, $2)
            RETURNING id, name, message, created_at
            "#,
        )
        .bind(name)
        .bind(message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to insert guestbook entry: {}", e);
            RepositoryError::from(e)
        })?;

        debug!("Inserted guestbook entry {}", record.id);
        Ok(record)
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<GuestbookEntry>> {
        let entries = sqlx::query_as::<_, GuestbookEntry>(
            r#"
            SELECT id, name, message, created_at
            FROM guestbook_entries
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(entries)
    }
}
