// Command replies

use serde::Serialize;

/// Protocol-level reply of a command
///
/// A throttled (denied) call and an empty source queue both answer `Nil`.
/// `Execution::denied` tells them apart for callers that need to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Reply {
    Nil,
    Integer(i64),
    #[serde(serialize_with = "serialize_bulk")]
    Bulk(Vec<u8>),
}

#[allow(clippy::ptr_arg)]
fn serialize_bulk<S: serde::Serializer>(value: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(value))
}

/// Result of a dispatched command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    pub reply: Reply,
    /// True when the throttle refused the action (no state was changed)
    pub denied: bool,
}

impl Execution {
    pub fn completed(reply: Reply) -> Self {
        Self {
            reply,
            denied: false,
        }
    }

    pub fn denied() -> Self {
        Self {
            reply: Reply::Nil,
            denied: true,
        }
    }
}
