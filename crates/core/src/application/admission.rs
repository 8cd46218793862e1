//! Admission Gate - decides whether a throttled action may run now
//!
//! An action of direction D on queue Q is eligible at `now` iff
//! `now >= last_admitted(D, Q) + interval(D, Q)`. There is no burst credit: a queue
//! that stayed idle for a long time gets exactly one immediate admission.
//!
//! The gate reads and writes inside the caller's store transaction, which is what makes
//! the read-compare-write sequence atomic.

use super::intervals::ConfigStore;
use super::timestamps::TimestampStore;
use crate::domain::{Direction, QueueName, ReservedKeys};
use crate::error::Result;
use crate::port::StoreTransaction;
use std::sync::Arc;
use tracing::debug;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Interval is 0: no check, no bookkeeping
    Unthrottled,
    /// Interval elapsed; the last-action timestamp now holds `now`
    Admitted,
    /// Interval not yet elapsed; nothing was written
    Denied,
}

impl Admission {
    pub fn is_denied(&self) -> bool {
        matches!(self, Admission::Denied)
    }
}

fn eligible(now: i64, last: i64, interval: i64) -> bool {
    now >= last.saturating_add(interval)
}

pub struct AdmissionGate {
    intervals: ConfigStore,
    timestamps: TimestampStore,
}

impl AdmissionGate {
    pub fn new(keys: Arc<ReservedKeys>) -> Self {
        Self {
            intervals: ConfigStore::new(keys.clone()),
            timestamps: TimestampStore::new(keys),
        }
    }

    /// Single-direction admission check
    pub async fn admit(
        &self,
        tx: &mut dyn StoreTransaction,
        direction: Direction,
        queue: &QueueName,
        now: i64,
    ) -> Result<Admission> {
        let interval = self.intervals.get_interval(tx, direction, queue).await?;
        if interval == 0 {
            return Ok(Admission::Unthrottled);
        }

        let last = self.timestamps.get_last(tx, direction, queue).await?;
        if !eligible(now, last, interval) {
            debug!(
                queue = %queue,
                direction = %direction,
                interval_ms = interval,
                wait_ms = last.saturating_add(interval) - now,
                "Admission denied"
            );
            return Ok(Admission::Denied);
        }

        self.timestamps.set_last(tx, direction, queue, now).await?;
        debug!(queue = %queue, direction = %direction, now = now, "Admission granted");
        Ok(Admission::Admitted)
    }

    /// Combined check for a pop from `source` followed by a push to `destination`.
    ///
    /// Both sides are judged against the same `now`. Either both timestamps are written
    /// or neither is.
    pub async fn admit_pair(
        &self,
        tx: &mut dyn StoreTransaction,
        source: &QueueName,
        destination: &QueueName,
        now: i64,
    ) -> Result<Admission> {
        let pop_interval = self
            .intervals
            .get_interval(tx, Direction::Pop, source)
            .await?;
        let push_interval = self
            .intervals
            .get_interval(tx, Direction::Push, destination)
            .await?;

        if pop_interval == 0 && push_interval == 0 {
            return Ok(Admission::Unthrottled);
        }

        let last_pop = self.timestamps.get_last(tx, Direction::Pop, source).await?;
        let last_push = self
            .timestamps
            .get_last(tx, Direction::Push, destination)
            .await?;

        let pop_ready = eligible(now, last_pop, pop_interval);
        let push_ready = eligible(now, last_push, push_interval);

        if !(pop_ready && push_ready) {
            debug!(
                source = %source,
                destination = %destination,
                pop_ready = pop_ready,
                push_ready = push_ready,
                "Move admission denied"
            );
            return Ok(Admission::Denied);
        }

        self.timestamps
            .set_last(tx, Direction::Pop, source, now)
            .await?;
        self.timestamps
            .set_last(tx, Direction::Push, destination, now)
            .await?;

        debug!(
            source = %source,
            destination = %destination,
            now = now,
            "Move admission granted"
        );
        Ok(Admission::Admitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::MemoryStore;
    use crate::error::AppError;
    use crate::port::TransactionalStore;

    fn gate() -> AdmissionGate {
        AdmissionGate::new(Arc::new(ReservedKeys::default()))
    }

    async fn configure(store: &MemoryStore, direction: Direction, queue: &str, interval: i64) {
        let key = ReservedKeys::default().intervals(direction).to_vec();
        store
            .seed_hash(&key, queue.as_bytes(), interval.to_string().as_bytes())
            .await;
    }

    async fn last(store: &MemoryStore, direction: Direction, queue: &str) -> Option<Vec<u8>> {
        let key = ReservedKeys::default().timestamps(direction).to_vec();
        store.hash_field(&key, queue.as_bytes()).await
    }

    async fn check(
        store: &MemoryStore,
        gate: &AdmissionGate,
        direction: Direction,
        queue: &str,
        now: i64,
    ) -> Admission {
        let mut tx = store.begin_transaction().await.unwrap();
        let admission = gate
            .admit(tx.as_mut(), direction, &QueueName::from(queue), now)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        admission
    }

    #[tokio::test]
    async fn test_unconfigured_queue_skips_bookkeeping() {
        let store = MemoryStore::new();
        let gate = gate();

        for now in [0, 0, 1, 2] {
            assert_eq!(
                check(&store, &gate, Direction::Pop, "q", now).await,
                Admission::Unthrottled
            );
        }
        assert_eq!(last(&store, Direction::Pop, "q").await, None);
    }

    #[tokio::test]
    async fn test_interval_sequence() {
        let store = MemoryStore::new();
        configure(&store, Direction::Pop, "q", 1000).await;
        let gate = gate();

        // (now, expected) -- admitted iff now >= last admitted + 1000
        let schedule = [
            (5_000, Admission::Admitted),
            (5_001, Admission::Denied),
            (5_999, Admission::Denied),
            (6_000, Admission::Admitted),
            (6_500, Admission::Denied),
            (60_000, Admission::Admitted),
            // No burst credit after a long idle period
            (60_001, Admission::Denied),
        ];

        for (now, expected) in schedule {
            assert_eq!(
                check(&store, &gate, Direction::Pop, "q", now).await,
                expected,
                "at {now}"
            );
        }
        assert_eq!(
            last(&store, Direction::Pop, "q").await,
            Some(b"60000".to_vec())
        );
    }

    #[tokio::test]
    async fn test_denial_is_idempotent() {
        let store = MemoryStore::new();
        configure(&store, Direction::Push, "q", 500).await;
        let gate = gate();

        assert_eq!(
            check(&store, &gate, Direction::Push, "q", 1_000_000).await,
            Admission::Admitted
        );
        let calls = store.hash_set_calls();
        for _ in 0..3 {
            assert_eq!(
                check(&store, &gate, Direction::Push, "q", 1_000_400).await,
                Admission::Denied
            );
        }
        assert_eq!(store.hash_set_calls(), calls);
        assert_eq!(
            last(&store, Direction::Push, "q").await,
            Some(b"1000000".to_vec())
        );
    }

    #[tokio::test]
    async fn test_zero_interval_overrides_old_timestamp() {
        let store = MemoryStore::new();
        configure(&store, Direction::Pop, "q", 10_000).await;
        let gate = gate();

        assert_eq!(
            check(&store, &gate, Direction::Pop, "q", 1_000_000).await,
            Admission::Admitted
        );
        configure(&store, Direction::Pop, "q", 0).await;
        for now in [1_000_001, 1_000_002, 1_000_003] {
            assert_eq!(
                check(&store, &gate, Direction::Pop, "q", now).await,
                Admission::Unthrottled
            );
        }
    }

    #[tokio::test]
    async fn test_directions_are_independent() {
        let store = MemoryStore::new();
        configure(&store, Direction::Pop, "q", 1000).await;
        configure(&store, Direction::Push, "q", 1000).await;
        let gate = gate();

        assert_eq!(
            check(&store, &gate, Direction::Pop, "q", 1_000_010).await,
            Admission::Admitted
        );
        assert_eq!(
            check(&store, &gate, Direction::Push, "q", 1_000_020).await,
            Admission::Admitted
        );
        assert_eq!(
            check(&store, &gate, Direction::Pop, "q", 1_000_030).await,
            Admission::Denied
        );
    }

    #[tokio::test]
    async fn test_pair_all_or_nothing() {
        let store = MemoryStore::new();
        configure(&store, Direction::Pop, "src", 1000).await;
        configure(&store, Direction::Push, "dst", 5000).await;
        let gate = gate();
        let (src, dst) = (QueueName::from("src"), QueueName::from("dst"));

        let mut tx = store.begin_transaction().await.unwrap();
        let first = gate.admit_pair(tx.as_mut(), &src, &dst, 10_000).await.unwrap();
        assert_eq!(first, Admission::Admitted);
        tx.commit().await.unwrap();
        assert_eq!(last(&store, Direction::Pop, "src").await, Some(b"10000".to_vec()));
        assert_eq!(last(&store, Direction::Push, "dst").await, Some(b"10000".to_vec()));

        // Pop side is ready again, push side is not
        let mut tx = store.begin_transaction().await.unwrap();
        let second = gate.admit_pair(tx.as_mut(), &src, &dst, 11_000).await.unwrap();
        assert_eq!(second, Admission::Denied);
        tx.commit().await.unwrap();
        assert_eq!(last(&store, Direction::Pop, "src").await, Some(b"10000".to_vec()));
        assert_eq!(last(&store, Direction::Push, "dst").await, Some(b"10000".to_vec()));

        let mut tx = store.begin_transaction().await.unwrap();
        let third = gate.admit_pair(tx.as_mut(), &src, &dst, 15_000).await.unwrap();
        assert_eq!(third, Admission::Admitted);
        tx.commit().await.unwrap();
        assert_eq!(last(&store, Direction::Pop, "src").await, Some(b"15000".to_vec()));
    }

    #[tokio::test]
    async fn test_pair_denied_while_source_cools_down() {
        let store = MemoryStore::new();
        configure(&store, Direction::Pop, "src", 5000).await;
        configure(&store, Direction::Push, "dst", 1000).await;
        let gate = gate();
        let (src, dst) = (QueueName::from("src"), QueueName::from("dst"));

        let mut tx = store.begin_transaction().await.unwrap();
        let first = gate.admit_pair(tx.as_mut(), &src, &dst, 10_000).await.unwrap();
        assert_eq!(first, Admission::Admitted);
        tx.commit().await.unwrap();

        // Push side is ready again, pop side is not
        let calls = store.hash_set_calls();
        let mut tx = store.begin_transaction().await.unwrap();
        let second = gate.admit_pair(tx.as_mut(), &src, &dst, 11_500).await.unwrap();
        assert_eq!(second, Admission::Denied);
        tx.commit().await.unwrap();

        assert_eq!(store.hash_set_calls(), calls);
        assert_eq!(last(&store, Direction::Pop, "src").await, Some(b"10000".to_vec()));
        assert_eq!(last(&store, Direction::Push, "dst").await, Some(b"10000".to_vec()));
    }

    #[tokio::test]
    async fn test_pair_unthrottled_when_both_zero() {
        let store = MemoryStore::new();
        let gate = gate();

        let mut tx = store.begin_transaction().await.unwrap();
        let admission = gate
            .admit_pair(tx.as_mut(), &QueueName::from("a"), &QueueName::from("b"), 1)
            .await
            .unwrap();
        assert_eq!(admission, Admission::Unthrottled);
        tx.commit().await.unwrap();
        assert_eq!(store.hash_set_calls(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_not_admitted() {
        let store = MemoryStore::new();
        configure(&store, Direction::Pop, "q", 10).await;
        store.seed_hash(b"rl::lastpoptimes", b"q", b"yesterday").await;
        let gate = gate();

        let mut tx = store.begin_transaction().await.unwrap();
        let err = gate
            .admit(tx.as_mut(), Direction::Pop, &QueueName::from("q"), 100)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Corruption { .. }));
    }
}
