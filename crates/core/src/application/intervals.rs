//! Interval configuration (per direction, per queue)
//!
//! One hash per direction maps queue name to the minimum spacing in milliseconds
//! between two admitted actions. Missing entries (or a missing hash) read as 0,
//! which means unthrottled.

use crate::domain::{Direction, DomainError, QueueName, ReservedKeys};
use crate::error::{AppError, Result};
use crate::port::StoreTransaction;
use std::sync::Arc;
use tracing::info;

/// Parse a stored or supplied millisecond value.
///
/// Accepts canonical non-negative decimal integers only: no sign, no leading zeros,
/// no whitespace.
pub fn parse_millis(raw: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(raw).ok()?;
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if !canonical {
        return None;
    }
    text.parse::<i64>().ok()
}

/// Read a millisecond value from a hash field, 0 when absent
pub(super) async fn read_millis(
    tx: &mut dyn StoreTransaction,
    key: &[u8],
    field: &[u8],
) -> Result<i64> {
    match tx.hash_get(key, field).await? {
        None => Ok(0),
        Some(raw) => parse_millis(&raw).ok_or_else(|| AppError::corruption(key, field)),
    }
}

/// IntervalConfig access
#[derive(Clone)]
pub struct ConfigStore {
    keys: Arc<ReservedKeys>,
}

impl ConfigStore {
    pub fn new(keys: Arc<ReservedKeys>) -> Self {
        Self { keys }
    }

    /// Write interval entries for `direction`, returning the number of fields written.
    ///
    /// Every pair is validated before the first write, so invalid input leaves the table
    /// untouched. Fields are written one primitive call at a time.
    pub async fn set_intervals(
        &self,
        tx: &mut dyn StoreTransaction,
        direction: Direction,
        pairs: &[(QueueName, Vec<u8>)],
    ) -> Result<i64> {
        let key = self.keys.intervals(direction);

        if !tx.key_type(key).await?.accepts_hash() {
            return Err(AppError::wrong_type(key));
        }

        if let Some((queue, raw)) = pairs.iter().find(|(_, raw)| parse_millis(raw).is_none()) {
            return Err(DomainError::InvalidInterval(format!(
                "{}={}",
                queue,
                String::from_utf8_lossy(raw)
            ))
            .into());
        }

        let mut written = 0;
        for (queue, raw) in pairs {
            tx.hash_set(key, queue.as_bytes(), raw).await?;
            written += 1;
        }

        info!(
            direction = %direction,
            fields = written,
            "Interval configuration updated"
        );

        Ok(written)
    }

    /// Configured interval for a queue, 0 if unconfigured
    pub async fn get_interval(
        &self,
        tx: &mut dyn StoreTransaction,
        direction: Direction,
        queue: &QueueName,
    ) -> Result<i64> {
        read_millis(tx, self.keys.intervals(direction), queue.as_bytes()).await
    }
}
