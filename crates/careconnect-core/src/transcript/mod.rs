//! Transcript: the ordered list of displayed chat messages.
//!
//! Entries are appended in the order their events happen: a user entry when
//! the message is sent, a bot entry when its response (or failure) arrives.

mod message;

pub use message::{EntryKind, MessageRole, TranscriptEntry};

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bot entries answering the given user entry.
    pub fn replies_to(&self, id: uuid::Uuid) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.reply_to == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut transcript = Transcript::new();
        let question = TranscriptEntry::user("hello");
        let question_id = question.id;
        transcript.push(question);
        transcript.push(TranscriptEntry::bot_reply("hi", question_id));

        let roles: Vec<MessageRole> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Bot]);
        assert_eq!(transcript.replies_to(question_id).count(), 1);
    }

    #[test]
    fn test_error_entries_are_marked() {
        let user = TranscriptEntry::user("x");
        let err = TranscriptEntry::bot_error("❌ Backend not reachable.", user.id);
        assert!(err.is_error());
        assert!(!user.is_error());
    }

    #[test]
    fn test_clear() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::user("x"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }
}
