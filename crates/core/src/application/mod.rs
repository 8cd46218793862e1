// Application Layer - Admission control and command dispatch

pub mod admission;
pub mod executor;
pub mod intervals;
pub mod service;
pub mod timestamps;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use admission::{Admission, AdmissionGate};
pub use executor::MoveExecutor;
pub use intervals::{parse_millis, ConfigStore};
pub use service::ThrottleService;
pub use timestamps::TimestampStore;
