//! Transcript entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Message,
    /// Locally generated after a failed request.
    Error,
}

/// One displayed chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: MessageRole,
    pub kind: EntryKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// For bot entries: the user entry this answers.
    pub reply_to: Option<Uuid>,
}

impl TranscriptEntry {
    fn new(role: MessageRole, kind: EntryKind, text: impl Into<String>, reply_to: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            kind,
            text: text.into(),
            timestamp: Utc::now(),
            reply_to,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, EntryKind::Message, text, None)
    }

    /// Bot entry that answers no particular user entry.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Bot, EntryKind::Message, text, None)
    }

    pub fn bot_reply(text: impl Into<String>, reply_to: Uuid) -> Self {
        Self::new(MessageRole::Bot, EntryKind::Message, text, Some(reply_to))
    }

    pub fn bot_error(text: impl Into<String>, reply_to: Uuid) -> Self {
        Self::new(MessageRole::Bot, EntryKind::Error, text, Some(reply_to))
    }

    pub fn is_error(&self) -> bool {
        self.kind == EntryKind::Error
    }
}
