//! Bounded conversation history.

use std::collections::VecDeque;

use crate::types::ConversationTurn;

/// Number of transcript lines kept by [`ConversationMemory::to_prompt`].
const PROMPT_LINES: usize = 10;

/// Fixed-capacity ring buffer of turns; the oldest turn is evicted first.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    buf: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn add(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(ConversationTurn { user_text: user.into(), assistant_text: assistant.into() });
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first transcript, numbered from 1, trimmed to the most recent lines.
    pub fn to_prompt(&self) -> String {
        let lines: Vec<String> = self
            .buf
            .iter()
            .enumerate()
            .flat_map(|(i, t)| {
                [
                    format!("User {}: {}", i + 1, t.user_text),
                    format!("Assistant {}: {}", i + 1, t.assistant_text),
                ]
            })
            .collect();
        let start = lines.len().saturating_sub(PROMPT_LINES);
        lines[start..].join("\n")
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(6)
    }
}
