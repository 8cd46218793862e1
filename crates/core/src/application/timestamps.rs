// Last admitted action per (direction, queue)

use super::intervals::read_millis;
use crate::domain::{Direction, QueueName, ReservedKeys};
use crate::error::Result;
use crate::port::StoreTransaction;
use std::sync::Arc;

/// LastActionTimestamp access. Only the admission gate reads or writes these entries.
#[derive(Clone)]
pub struct TimestampStore {
    keys: Arc<ReservedKeys>,
}

impl TimestampStore {
    pub fn new(keys: Arc<ReservedKeys>) -> Self {
        Self { keys }
    }

    /// Milliseconds since epoch of the last admitted action, 0 if none
    pub async fn get_last(
        &self,
        tx: &mut dyn StoreTransaction,
        direction: Direction,
        queue: &QueueName,
    ) -> Result<i64> {
        read_millis(tx, self.keys.timestamps(direction), queue.as_bytes()).await
    }

    pub async fn set_last(
        &self,
        tx: &mut dyn StoreTransaction,
        direction: Direction,
        queue: &QueueName,
        timestamp_millis: i64,
    ) -> Result<()> {
        tx.hash_set(
            self.keys.timestamps(direction),
            queue.as_bytes(),
            timestamp_millis.to_string().as_bytes(),
        )
        .await?;
        Ok(())
    }
}
