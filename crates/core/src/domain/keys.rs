// Reserved key layout for throttle bookkeeping

use super::error::DomainError;
use super::queue::Direction;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Default namespace prefix for reserved keys
pub const DEFAULT_KEY_PREFIX: &str = "rl";

/// Which command surface the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// POP and PUSH throttles, six queue commands
    #[default]
    Dual,
    /// A single "dequeue" throttle on POP commands only
    Dequeue,
}

impl FromStr for Variant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dual" => Ok(Variant::Dual),
            "dequeue" => Ok(Variant::Dequeue),
            _ => Err(DomainError::InvalidVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Dual => write!(f, "dual"),
            Variant::Dequeue => write!(f, "dequeue"),
        }
    }
}

/// Names of the hashes holding interval configuration and last-action timestamps.
///
/// Built once at startup and shared by the gate and the dispatcher. These names live in
/// the store's global key namespace, so the prefix should not collide with queue names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedKeys {
    variant: Variant,
    pop_intervals: Vec<u8>,
    push_intervals: Vec<u8>,
    last_pop_times: Vec<u8>,
    last_push_times: Vec<u8>,
}

impl ReservedKeys {
    pub fn new(prefix: &str, variant: Variant) -> Self {
        let key = |suffix: &str| format!("{prefix}::{suffix}").into_bytes();

        match variant {
            Variant::Dual => Self {
                variant,
                pop_intervals: key("popintervals"),
                push_intervals: key("pushintervals"),
                last_pop_times: key("lastpoptimes"),
                last_push_times: key("lastpushtimes"),
            },
            // PUSH is never throttled here; its names are kept only so lookups stay total
            Variant::Dequeue => Self {
                variant,
                pop_intervals: key("dequeueintervals"),
                push_intervals: key("pushintervals"),
                last_pop_times: key("lastdequeuetimes"),
                last_push_times: key("lastpushtimes"),
            },
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Hash holding IntervalConfig for a direction
    pub fn intervals(&self, direction: Direction) -> &[u8] {
        match direction {
            Direction::Pop => &self.pop_intervals,
            Direction::Push => &self.push_intervals,
        }
    }

    /// Hash holding LastActionTimestamp for a direction
    pub fn timestamps(&self, direction: Direction) -> &[u8] {
        match direction {
            Direction::Pop => &self.last_pop_times,
            Direction::Push => &self.last_push_times,
        }
    }
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX, Variant::Dual)
    }
}
