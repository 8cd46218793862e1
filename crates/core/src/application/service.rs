//! Throttle Service - command dispatch
//!
//! Request flow:
//! 1. parse + arity check (no store access)
//! 2. open one store transaction
//! 3. sample the clock once
//! 4. list-type preflight, admission, execution
//! 5. commit, or roll back on any error

use super::admission::{Admission, AdmissionGate};
use super::executor::MoveExecutor;
use super::intervals::ConfigStore;
use crate::domain::{Command, CommandName, Direction, Execution, Reply, ReservedKeys, Variant};
use crate::error::Result;
use crate::port::{StoreTransaction, TimeProvider, TransactionalStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Rate-limited queue service (one per process)
pub struct ThrottleService {
    store: Arc<dyn TransactionalStore>,
    time_provider: Arc<dyn TimeProvider>,
    keys: Arc<ReservedKeys>,
    config: ConfigStore,
    gate: AdmissionGate,
    executor: MoveExecutor,
}

impl ThrottleService {
    pub fn new(
        store: Arc<dyn TransactionalStore>,
        time_provider: Arc<dyn TimeProvider>,
        keys: ReservedKeys,
    ) -> Self {
        let keys = Arc::new(keys);
        Self {
            store,
            time_provider,
            config: ConfigStore::new(keys.clone()),
            gate: AdmissionGate::new(keys.clone()),
            keys,
            executor: MoveExecutor,
        }
    }

    pub fn variant(&self) -> Variant {
        self.keys.variant()
    }

    /// Commands registered for the active variant
    pub fn commands(&self) -> Vec<CommandName> {
        CommandName::table(self.variant())
    }

    /// Execute one command given as `argv` (command name first)
    pub async fn execute(&self, argv: &[Vec<u8>]) -> Result<Execution> {
        let (name, command) = Command::parse(argv, self.variant())?;

        let mut tx = self.store.begin_transaction().await?;
        match self.run(tx.as_mut(), command).await {
            Ok(execution) => {
                tx.commit().await?;
                debug!(
                    command = name.as_str(),
                    denied = execution.denied,
                    "Command executed"
                );
                Ok(execution)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        command = name.as_str(),
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                debug!(command = name.as_str(), error = %err, "Command failed");
                Err(err)
            }
        }
    }

    async fn run(&self, tx: &mut dyn StoreTransaction, command: Command) -> Result<Execution> {
        match command {
            Command::SetIntervals { direction, pairs } => {
                let written = self.config.set_intervals(tx, direction, &pairs).await?;
                Ok(Execution::completed(Reply::Integer(written)))
            }

            Command::Pop { queue, end } => {
                self.executor.ensure_lists(tx, &[&queue]).await?;
                let now = self.now();
                if self.gate.admit(tx, Direction::Pop, &queue, now).await?.is_denied() {
                    return Ok(Execution::denied());
                }
                let reply = self.executor.pop(tx, &queue, end).await?;
                Ok(Execution::completed(reply))
            }

            Command::Push {
                queue,
                end,
                element,
            } => {
                self.executor.ensure_lists(tx, &[&queue]).await?;
                let now = self.now();
                if self.gate.admit(tx, Direction::Push, &queue, now).await?.is_denied() {
                    return Ok(Execution::denied());
                }
                let reply = self.executor.push(tx, &queue, end, &element).await?;
                Ok(Execution::completed(reply))
            }

            Command::Move {
                source,
                from,
                destination,
                to,
            } => {
                self.executor
                    .ensure_lists(tx, &[&source, &destination])
                    .await?;

                // The dequeue-only surface registers its diagonal move without a throttle
                let admission = match self.variant() {
                    Variant::Dual => {
                        let now = self.now();
                        self.gate
                            .admit_pair(tx, &source, &destination, now)
                            .await?
                    }
                    Variant::Dequeue => Admission::Unthrottled,
                };
                if admission.is_denied() {
                    return Ok(Execution::denied());
                }

                let reply = self
                    .executor
                    .move_element(tx, &source, from, &destination, to)
                    .await?;
                Ok(Execution::completed(reply))
            }
        }
    }

    /// Single clock sample per request; clamped so stored timestamps stay non-negative
    fn now(&self) -> i64 {
        self.time_provider.now_millis().max(0)
    }
}
