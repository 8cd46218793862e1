// Move Executor - runs admitted pop/push/move actions against the store

use crate::domain::{ListEnd, QueueName, Reply};
use crate::error::{AppError, Result};
use crate::port::StoreTransaction;
use tracing::debug;

/// Stateless; every call works inside the caller's transaction
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveExecutor;

impl MoveExecutor {
    /// Fail with WrongType if any queue key exists and is not a list.
    ///
    /// Run before admission so a wrong-typed queue never touches throttle state.
    pub async fn ensure_lists(
        &self,
        tx: &mut dyn StoreTransaction,
        queues: &[&QueueName],
    ) -> Result<()> {
        for queue in queues {
            if !tx.key_type(queue.as_bytes()).await?.accepts_list() {
                return Err(AppError::wrong_type(queue.as_bytes()));
            }
        }
        Ok(())
    }

    /// Pop one element; `Nil` when the queue is empty
    pub async fn pop(
        &self,
        tx: &mut dyn StoreTransaction,
        queue: &QueueName,
        end: ListEnd,
    ) -> Result<Reply> {
        Ok(match tx.list_pop(queue.as_bytes(), end).await? {
            Some(element) => Reply::Bulk(element),
            None => Reply::Nil,
        })
    }

    /// Push one element; replies with the new length
    pub async fn push(
        &self,
        tx: &mut dyn StoreTransaction,
        queue: &QueueName,
        end: ListEnd,
        element: &[u8],
    ) -> Result<Reply> {
        let len = tx.list_push(queue.as_bytes(), end, element).await?;
        Ok(Reply::Integer(len))
    }

    /// Pop from `source` and push the same element to `destination`.
    ///
    /// An empty source answers `Nil` and pushes nothing. Source and destination may be
    /// the same queue (rotation).
    pub async fn move_element(
        &self,
        tx: &mut dyn StoreTransaction,
        source: &QueueName,
        from: ListEnd,
        destination: &QueueName,
        to: ListEnd,
    ) -> Result<Reply> {
        let Some(element) = tx.list_pop(source.as_bytes(), from).await? else {
            debug!(source = %source, "Move skipped: source empty");
            return Ok(Reply::Nil);
        };

        tx.list_push(destination.as_bytes(), to, &element).await?;
        Ok(Reply::Bulk(element))
    }
}
