// Domain Layer - Pure types: queues, directions, commands, replies

pub mod command;
pub mod error;
pub mod keys;
pub mod queue;
pub mod reply;

// Re-exports
pub use command::{Arity, Command, CommandName};
pub use error::DomainError;
pub use keys::{ReservedKeys, Variant, DEFAULT_KEY_PREFIX};
pub use queue::{Direction, ListEnd, QueueName};
pub use reply::{Execution, Reply};
