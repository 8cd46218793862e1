// Transaction port for atomic operations

use super::store::KeyType;
use crate::domain::ListEnd;
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Store that hands out serialized transactions.
///
/// Implementations must guarantee that no other transaction observes or changes state
/// between `begin_transaction` and `commit`/`rollback`; the admission gate's
/// read-compare-write relies on it.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction>>;
}

/// List and hash primitives (within a transaction)
///
/// Hash and list operations fail with `AppError::WrongType` when the key holds another shape.
#[async_trait]
pub trait StoreTransaction: Transaction {
    /// Shape of `key`, `KeyType::Empty` if absent
    async fn key_type(&mut self, key: &[u8]) -> Result<KeyType>;

    /// Read a hash field; `None` if the hash or the field is absent
    async fn hash_get(&mut self, key: &[u8], field: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Write a single hash field, creating the hash if needed
    ///
    /// Returns true if the field did not exist before.
    async fn hash_set(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<bool>;

    /// Remove and return the element at `end`; `None` for an empty list
    async fn list_pop(&mut self, key: &[u8], end: ListEnd) -> Result<Option<Vec<u8>>>;

    /// Insert at `end`, creating the list if needed; returns the new length
    async fn list_push(&mut self, key: &[u8], end: ListEnd, value: &[u8]) -> Result<i64>;

    /// Number of elements, 0 if absent
    async fn list_len(&mut self, key: &[u8]) -> Result<i64>;

    /// Store a plain string value, replacing whatever the key held
    async fn string_set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;
}
