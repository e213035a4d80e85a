//! In-flight command input state.
//!
//! A `CommandState` is created by the dispatcher when a command starts and is
//! threaded through every `feed` call until the command is ready. The command
//! reads keys through [`CommandState::next`] and talks back to the dispatcher
//! by flipping the two request flags.

use tracing::trace;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandState {
    keys: Vec<char>,
    index: usize,
    /// Set by a command when it needs another key before it can execute.
    pub more_input: bool,
    /// Set by a command when the next key must be delivered verbatim (not
    /// interpreted by the dispatcher, e.g. as a cancel key).
    pub accepting_any_input: bool,
}

impl CommandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor pre-loading typed keys.
    pub fn with_keys(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
            ..Self::default()
        }
    }

    pub fn push_key(&mut self, key: char) {
        self.keys.push(key);
        trace!(target: "state.command", key = %key, pending = self.keys.len() - self.index, "push_key");
    }

    /// True when every typed key has been consumed.
    pub fn is_at_eof(&self) -> bool {
        self.index >= self.keys.len()
    }

    /// Consume the next unread key.
    pub fn next(&mut self) -> Option<char> {
        let key = self.keys.get(self.index).copied()?;
        self.index += 1;
        Some(key)
    }

    /// All keys typed so far (consumed or not).
    pub fn keys(&self) -> &[char] {
        &self.keys
    }

    /// Number of keys consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
