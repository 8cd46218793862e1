//! In-memory store used by unit tests
//!
//! Transactions work on a copy of the data and publish it on commit, while holding the
//! store lock for their whole lifetime.

use crate::domain::ListEnd;
use crate::error::{AppError, Result};
use crate::port::{KeyType, StoreTransaction, Transaction, TransactionalStore};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone)]
enum Value {
    Str(Vec<u8>),
    List(VecDeque<Vec<u8>>),
    Hash(HashMap<Vec<u8>, Vec<u8>>),
}

type Keyspace = HashMap<Vec<u8>, Value>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Keyspace>>,
    hash_set_calls: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `hash_set` primitive calls issued through transactions
    pub fn hash_set_calls(&self) -> usize {
        self.hash_set_calls.load(Ordering::SeqCst)
    }

    pub async fn seed_string(&self, key: &[u8], value: &[u8]) {
        self.data
            .lock()
            .await
            .insert(key.to_vec(), Value::Str(value.to_vec()));
    }

    pub async fn seed_hash(&self, key: &[u8], field: &[u8], value: &[u8]) {
        let mut data = self.data.lock().await;
        let entry = data
            .entry(key.to_vec())
            .or_insert_with(|| Value::Hash(HashMap::new()));
        if let Value::Hash(hash) = entry {
            hash.insert(field.to_vec(), value.to_vec());
        }
    }

    pub async fn seed_list(&self, key: &[u8], items: &[&[u8]]) {
        let list = items.iter().map(|i| i.to_vec()).collect();
        self.data
            .lock()
            .await
            .insert(key.to_vec(), Value::List(list));
    }

    pub async fn hash_field(&self, key: &[u8], field: &[u8]) -> Option<Vec<u8>> {
        match self.data.lock().await.get(key) {
            Some(Value::Hash(hash)) => hash.get(field).cloned(),
            _ => None,
        }
    }

    pub async fn list(&self, key: &[u8]) -> Vec<Vec<u8>> {
        match self.data.lock().await.get(key) {
            Some(Value::List(list)) => list.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = self.data.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            working,
            hash_set_calls: self.hash_set_calls.clone(),
        }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<Keyspace>,
    working: Keyspace,
    hash_set_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        let working = std::mem::take(&mut self.working);
        *self.guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn key_type(&mut self, key: &[u8]) -> Result<KeyType> {
        Ok(match self.working.get(key) {
            None => KeyType::Empty,
            Some(Value::Str(_)) => KeyType::String,
            Some(Value::List(_)) => KeyType::List,
            Some(Value::Hash(_)) => KeyType::Hash,
        })
    }

    async fn hash_get(&mut self, key: &[u8], field: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.working.get(key) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(_) => Err(AppError::wrong_type(key)),
        }
    }

    async fn hash_set(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<bool> {
        self.hash_set_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self
            .working
            .entry(key.to_vec())
            .or_insert_with(|| Value::Hash(HashMap::new()));
        match entry {
            Value::Hash(hash) => Ok(hash.insert(field.to_vec(), value.to_vec()).is_none()),
            _ => Err(AppError::wrong_type(key)),
        }
    }

    async fn list_pop(&mut self, key: &[u8], end: ListEnd) -> Result<Option<Vec<u8>>> {
        let (popped, now_empty) = match self.working.get_mut(key) {
            None => return Ok(None),
            Some(Value::List(list)) => {
                let popped = match end {
                    ListEnd::Head => list.pop_front(),
                    ListEnd::Tail => list.pop_back(),
                };
                (popped, list.is_empty())
            }
            Some(_) => return Err(AppError::wrong_type(key)),
        };
        if now_empty {
            self.working.remove(key);
        }
        Ok(popped)
    }

    async fn list_push(&mut self, key: &[u8], end: ListEnd, value: &[u8]) -> Result<i64> {
        let entry = self
            .working
            .entry(key.to_vec())
            .or_insert_with(|| Value::List(VecDeque::new()));
        match entry {
            Value::List(list) => {
                match end {
                    ListEnd::Head => list.push_front(value.to_vec()),
                    ListEnd::Tail => list.push_back(value.to_vec()),
                }
                Ok(list.len() as i64)
            }
            _ => Err(AppError::wrong_type(key)),
        }
    }

    async fn list_len(&mut self, key: &[u8]) -> Result<i64> {
        match self.working.get(key) {
            None => Ok(0),
            Some(Value::List(list)) => Ok(list.len() as i64),
            Some(_) => Err(AppError::wrong_type(key)),
        }
    }

    async fn string_set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.working
            .insert(key.to_vec(), Value::Str(value.to_vec()));
        Ok(())
    }
}
