// Ratelist Infrastructure - SQLite Adapter
// Implements: TransactionalStore / StoreTransaction (list + hash primitives)

mod connection;
mod migration;
mod store;
mod transaction;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use store::SqliteStore;
pub use transaction::SqliteStoreTransaction;

// Note: sqlx::Error conversion is handled by `store::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
