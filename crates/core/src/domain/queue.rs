// Queue Domain Model

use serde::Serialize;
use std::fmt;

/// Name of a list-shaped queue in the store's key namespace (arbitrary bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueName(Vec<u8>);

impl QueueName {
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Self(name.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for QueueName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Throttled action type. POP and PUSH are configured and tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Pop,
    Push,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Pop => write!(f, "pop"),
            Direction::Push => write!(f, "push"),
        }
    }
}

/// Physical end of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListEnd {
    Head,
    Tail,
}

impl fmt::Display for ListEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListEnd::Head => write!(f, "head"),
            ListEnd::Tail => write!(f, "tail"),
        }
    }
}
