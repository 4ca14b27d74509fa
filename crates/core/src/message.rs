//! Chat Message Log
//!
//! This module defines the message model shared by all conversation sessions:
//! a closed set of speaker roles and an append-only, strictly ordered log of
//! entries. A log belongs to exactly one session and is only ever mutated by
//! that session's orchestrator; presentation code gets read access.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The speaker of a single chat entry.
///
/// Modeled as a closed enum rather than a free-form string so that
/// presentation code can match exhaustively and unknown roles cannot appear
/// at runtime.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Professor,
    Coach,
    System,
    Error,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Professor => write!(f, "professor"),
            Role::Coach => write!(f, "coach"),
            Role::System => write!(f, "system"),
            Role::Error => write!(f, "error"),
        }
    }
}

/// One immutable chat entry.
///
/// The `id` is unique within a log and exists for rendering purposes only;
/// ordering semantics live entirely in `sequence`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub sequence: u64,
}

/// An ordered, append-only sequence of messages for one session.
///
/// Sequence numbers are assigned on push and are strictly increasing.
/// There is deliberately no way to remove or rewrite an entry.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
    next_sequence: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new message and returns a reference to it.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &Message {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(Message {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            sequence,
        });
        // Just pushed, so the vector is non-empty.
        &self.entries[self.entries.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
