// SQLite TransactionalStore Implementation

use crate::{create_pool, run_migrations, SqliteStoreTransaction};
use async_trait::async_trait;
use ratelist_core::error::{AppError, Result};
use ratelist_core::port::{StoreTransaction, TransactionalStore};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

/// List/hash store on SQLite.
///
/// Transactions are serialized store-wide: `begin_transaction` waits for the previous
/// transaction to commit or roll back, the way a single-threaded key-value server
/// processes one command at a time.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create the pool, apply migrations and wrap it
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        info!(database_url = %database_url, "SQLite store ready");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TransactionalStore for SqliteStore {
    async fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = self.write_lock.clone().lock_owned().await;
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteStoreTransaction::new(tx, guard)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratelist_core::domain::ListEnd;
    use ratelist_core::port::KeyType;

    async fn store() -> SqliteStore {
        SqliteStore::open("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_list_ends() {
        let store = store().await;
        let mut tx = store.begin_transaction().await.unwrap();

        assert_eq!(tx.list_push(b"q", ListEnd::Tail, b"b").await.unwrap(), 1);
        assert_eq!(tx.list_push(b"q", ListEnd::Tail, b"c").await.unwrap(), 2);
        assert_eq!(tx.list_push(b"q", ListEnd::Head, b"a").await.unwrap(), 3);
        assert_eq!(tx.key_type(b"q").await.unwrap(), KeyType::List);

        assert_eq!(
            tx.list_pop(b"q", ListEnd::Head).await.unwrap(),
            Some(b"a".to_vec())
        );
        assert_eq!(
            tx.list_pop(b"q", ListEnd::Tail).await.unwrap(),
            Some(b"c".to_vec())
        );
        assert_eq!(
            tx.list_pop(b"q", ListEnd::Tail).await.unwrap(),
            Some(b"b".to_vec())
        );

        // Emptied lists disappear from the keyspace
        assert_eq!(tx.list_pop(b"q", ListEnd::Head).await.unwrap(), None);
        assert_eq!(tx.key_type(b"q").await.unwrap(), KeyType::Empty);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_hash_fields() {
        let store = store().await;
        let mut tx = store.begin_transaction().await.unwrap();

        assert_eq!(tx.hash_get(b"h", b"f").await.unwrap(), None);
        assert!(tx.hash_set(b"h", b"f", b"1").await.unwrap());
        assert!(!tx.hash_set(b"h", b"f", b"2").await.unwrap());
        assert_eq!(tx.hash_get(b"h", b"f").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(tx.hash_get(b"h", b"other").await.unwrap(), None);
        assert_eq!(tx.key_type(b"h").await.unwrap(), KeyType::Hash);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_wrong_type_errors() {
        let store = store().await;
        let mut tx = store.begin_transaction().await.unwrap();

        tx.string_set(b"s", b"v").await.unwrap();
        tx.list_push(b"l", ListEnd::Tail, b"x").await.unwrap();

        assert!(matches!(
            tx.hash_get(b"s", b"f").await,
            Err(AppError::WrongType { .. })
        ));
        assert!(matches!(
            tx.hash_set(b"l", b"f", b"v").await,
            Err(AppError::WrongType { .. })
        ));
        assert!(matches!(
            tx.list_pop(b"s", ListEnd::Head).await,
            Err(AppError::WrongType { .. })
        ));
        assert!(matches!(
            tx.list_push(b"s", ListEnd::Head, b"x").await,
            Err(AppError::WrongType { .. })
        ));

        // Overwriting with a string replaces the list entirely
        tx.string_set(b"l", b"now a string").await.unwrap();
        assert_eq!(tx.key_type(b"l").await.unwrap(), KeyType::String);
        assert_eq!(tx.list_len(b"missing").await.unwrap(), 0);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = store().await;

        let mut tx = store.begin_transaction().await.unwrap();
        tx.list_push(b"q", ListEnd::Tail, b"x").await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = store.begin_transaction().await.unwrap();
        assert_eq!(tx.key_type(b"q").await.unwrap(), KeyType::Empty);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_transactions_are_serialized() {
        let store = store().await;

        let mut first = store.begin_transaction().await.unwrap();
        first.list_push(b"q", ListEnd::Tail, b"x").await.unwrap();

        let contender = store.clone();
        let waiting = tokio::spawn(async move {
            let mut tx = contender.begin_transaction().await.unwrap();
            let len = tx.list_len(b"q").await.unwrap();
            tx.commit().await.unwrap();
            len
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!waiting.is_finished());

        first.commit().await.unwrap();
        assert_eq!(waiting.await.unwrap(), 1);
    }
}
