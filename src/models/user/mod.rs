// User module
// Identity of the signed-in account as supplied by the session collaborator

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The current user. Only the fields the planner reads are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Tomato coins earned from completed pomodoros
    pub coins: u64,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            coins: 0,
        }
    }
}
