// Store Port - shapes of keys in the external list/hash store

use serde::Serialize;
use std::fmt;

/// Shape of a key in the store's namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Key does not exist
    Empty,
    String,
    List,
    Hash,
}

impl KeyType {
    /// Missing keys are acceptable wherever a list is expected
    pub fn accepts_list(&self) -> bool {
        matches!(self, KeyType::Empty | KeyType::List)
    }

    pub fn accepts_hash(&self) -> bool {
        matches!(self, KeyType::Empty | KeyType::Hash)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Empty => write!(f, "none"),
            KeyType::String => write!(f, "string"),
            KeyType::List => write!(f, "list"),
            KeyType::Hash => write!(f, "hash"),
        }
    }
}

impl std::str::FromStr for KeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(KeyType::Empty),
            "string" => Ok(KeyType::String),
            "list" => Ok(KeyType::List),
            "hash" => Ok(KeyType::Hash),
            other => Err(format!("unknown key type: {other}")),
        }
    }
}
