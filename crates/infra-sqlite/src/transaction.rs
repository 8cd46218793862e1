// SQLite Transaction Implementation

use crate::store::map_sqlx_error;
use async_trait::async_trait;
use ratelist_core::domain::ListEnd;
use ratelist_core::error::{AppError, Result};
use ratelist_core::port::{KeyType, StoreTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use tokio::sync::OwnedMutexGuard;

/// One store transaction; holds the store-wide write lock until commit or rollback
pub struct SqliteStoreTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
    guard: OwnedMutexGuard<()>,
}

impl SqliteStoreTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>, guard: OwnedMutexGuard<()>) -> Self {
        Self { tx, guard }
    }

    /// Ok(true) if `key` holds `expected`, Ok(false) if absent, WrongType otherwise
    async fn expect_kind(&mut self, key: &[u8], expected: KeyType) -> Result<bool> {
        match self.key_type(key).await? {
            KeyType::Empty => Ok(false),
            actual if actual == expected => Ok(true),
            _ => Err(AppError::wrong_type(key)),
        }
    }

    async fn create_key(&mut self, key: &[u8], kind: KeyType) -> Result<()> {
        sqlx::query("INSERT INTO keyspace (key, kind) VALUES (?, ?)")
            .bind(key)
            .bind(kind.to_string())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_key(&mut self, key: &[u8]) -> Result<()> {
        // ON DELETE CASCADE removes fields, items and string values
        sqlx::query("DELETE FROM keyspace WHERE key = ?")
            .bind(key)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl Transaction for SqliteStoreTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        let SqliteStoreTransaction { tx, guard } = *self;
        tx.commit().await.map_err(map_sqlx_error)?;
        drop(guard);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let SqliteStoreTransaction { tx, guard } = *self;
        tx.rollback().await.map_err(map_sqlx_error)?;
        drop(guard);
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for SqliteStoreTransaction {
    async fn key_type(&mut self, key: &[u8]) -> Result<KeyType> {
        let kind: Option<String> = sqlx::query_scalar("SELECT kind FROM keyspace WHERE key = ?")
            .bind(key)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        match kind {
            None => Ok(KeyType::Empty),
            Some(kind) => kind.parse().map_err(AppError::Database),
        }
    }

    async fn hash_get(&mut self, key: &[u8], field: &[u8]) -> Result<Option<Vec<u8>>> {
        if !self.expect_kind(key, KeyType::Hash).await? {
            return Ok(None);
        }

        sqlx::query_scalar("SELECT value FROM hash_fields WHERE key = ? AND field = ?")
            .bind(key)
            .bind(field)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }

    async fn hash_set(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<bool> {
        if !self.expect_kind(key, KeyType::Hash).await? {
            self.create_key(key, KeyType::Hash).await?;
        }

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM hash_fields WHERE key = ? AND field = ?")
                .bind(key)
                .bind(field)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO hash_fields (key, field, value) VALUES (?, ?, ?)
            ON CONFLICT (key, field) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(field)
        .bind(value)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(existing.is_none())
    }

    async fn list_pop(&mut self, key: &[u8], end: ListEnd) -> Result<Option<Vec<u8>>> {
        if !self.expect_kind(key, KeyType::List).await? {
            return Ok(None);
        }

        let sql = match end {
            ListEnd::Head => {
                "SELECT position, value FROM list_items WHERE key = ? ORDER BY position ASC LIMIT 1"
            }
            ListEnd::Tail => {
                "SELECT position, value FROM list_items WHERE key = ? ORDER BY position DESC LIMIT 1"
            }
        };
        let item: Option<(i64, Vec<u8>)> = sqlx::query_as(sql)
            .bind(key)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        let Some((position, value)) = item else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM list_items WHERE key = ? AND position = ?")
            .bind(key)
            .bind(position)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if self.list_len(key).await? == 0 {
            self.delete_key(key).await?;
        }

        Ok(Some(value))
    }

    async fn list_push(&mut self, key: &[u8], end: ListEnd, value: &[u8]) -> Result<i64> {
        if !self.expect_kind(key, KeyType::List).await? {
            self.create_key(key, KeyType::List).await?;
        }

        let sql = match end {
            ListEnd::Head => "SELECT MIN(position) - 1 FROM list_items WHERE key = ?",
            ListEnd::Tail => "SELECT MAX(position) + 1 FROM list_items WHERE key = ?",
        };
        let position: Option<i64> = sqlx::query_scalar(sql)
            .bind(key)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO list_items (key, position, value) VALUES (?, ?, ?)")
            .bind(key)
            .bind(position.unwrap_or(0))
            .bind(value)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        self.list_len(key).await
    }

    async fn list_len(&mut self, key: &[u8]) -> Result<i64> {
        if !self.expect_kind(key, KeyType::List).await? {
            return Ok(0);
        }

        sqlx::query_scalar("SELECT COUNT(*) FROM list_items WHERE key = ?")
            .bind(key)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }

    async fn string_set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.delete_key(key).await?;
        self.create_key(key, KeyType::String).await?;

        sqlx::query("INSERT INTO string_values (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
