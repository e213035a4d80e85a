//! Dispatcher driving typed keys through mappings and the operator lifecycle.
//!
//! Key flow:
//! * Idle: keys accumulate and are resolved against the current mode's
//!   mapping trie. A strict prefix (`c` of `cs`) waits for more keys, and so
//!   does a complete mapping that a longer one still extends (`d` while `ds`
//!   is mapped). When the keys stop matching, only the first one is handed
//!   back as unmapped and the rest are resolved again. A `<Plug>` match
//!   starts the registered command with any keys typed past the mapping as
//!   its first input.
//! * Command pending: unless the command asked to accept any input, `<Esc>`
//!   cancels it. Every other key is appended to the command state and the
//!   command is fed again.
//! * `Ready` runs `execute` inside one edit batch, then `reset` always runs.
//!   Errors abort the command the same way (reset, nothing kept). Keys the
//!   command did not consume go back to mapping resolution.
//!
//! One key can produce several outcomes (a handed-back key followed by the
//! replay of the keys behind it), so `handle_key` returns them in order.

use crate::error::SurroundError;
use crate::operator::{Operator, Status};
use crate::registry::CommandRegistry;
use crate::surround::SurroundOutcome;
use core_keymap::{ESC, MappingOutput, MappingTrie, Resolution};
use core_state::{CommandState, EditOperation, EditorState, Mode};
use std::collections::HashMap;
use tracing::{debug, trace};

/// What a single key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Waiting for more keys (mapping prefix or command input).
    Pending,
    /// A command ran to completion.
    Executed {
        command: &'static str,
        kind: EditOperation,
        outcome: SurroundOutcome,
    },
    /// The in-flight command (or command lookup) failed; nothing is pending anymore.
    Aborted(SurroundError),
    /// `<Esc>` with nothing pending to cancel, or a cleared key prefix.
    Cleared,
    /// No mapping starts with this key.
    Unmapped(char),
}

struct ActiveCommand {
    op: Box<dyn Operator>,
    state: CommandState,
}

pub struct Dispatcher {
    registry: CommandRegistry,
    tries: HashMap<Mode, MappingTrie>,
    pending_keys: Vec<char>,
    active: Option<ActiveCommand>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            tries: HashMap::new(),
            pending_keys: Vec::new(),
            active: None,
        }
    }

    /// Mutable registry access; cached mapping tries are rebuilt on next use.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        self.tries.clear();
        &mut self.registry
    }

    /// True while a mapping prefix or a command is waiting for keys.
    pub fn is_pending(&self) -> bool {
        self.active.is_some() || !self.pending_keys.is_empty()
    }

    /// Name of the command currently collecting input.
    pub fn active_command(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.op.name())
    }

    /// Host abort signal: drop the pending prefix and reset any in-flight command.
    pub fn abort(&mut self) {
        self.pending_keys.clear();
        if let Some(mut active) = self.active.take() {
            active.op.reset();
            debug!(target: "actions.dispatch", command = active.op.name(), "command_aborted_by_host");
        }
    }

    /// Feed one typed key. Outcomes are returned in the order they happened;
    /// usually there is exactly one.
    pub fn handle_key(&mut self, editor: &mut EditorState, key: char) -> Vec<KeyOutcome> {
        trace!(target: "actions.dispatch", key = %key.escape_debug(), mode = ?editor.mode, "key");
        let mut outcomes = Vec::new();
        if let Some(mut active) = self.active.take() {
            if key == ESC && !active.state.accepting_any_input {
                active.op.reset();
                debug!(target: "actions.dispatch", command = active.op.name(), "command_cancelled");
                outcomes.push(KeyOutcome::Aborted(SurroundError::Cancelled));
                return outcomes;
            }
            active.state.push_key(key);
            outcomes.push(self.drive(active, editor));
        } else if key == ESC && !self.pending_keys.is_empty() {
            self.pending_keys.clear();
            trace!(target: "actions.dispatch", "prefix_cleared");
            outcomes.push(KeyOutcome::Cleared);
            return outcomes;
        } else {
            self.pending_keys.push(key);
        }
        self.resolve_pending(editor, &mut outcomes);
        outcomes
    }

    /// Resolve queued keys until they run out, a command is left collecting
    /// input, or a prefix is waiting for more keys.
    fn resolve_pending(&mut self, editor: &mut EditorState, outcomes: &mut Vec<KeyOutcome>) {
        while self.active.is_none() && !self.pending_keys.is_empty() {
            let mode = editor.mode;
            let trie = self
                .tries
                .entry(mode)
                .or_insert_with(|| self.registry.trie(mode));
            match trie.resolve(&self.pending_keys) {
                Resolution::NeedMore | Resolution::Matched { ambiguous: true, .. } => {
                    outcomes.push(KeyOutcome::Pending);
                    return;
                }
                Resolution::FallbackLiteral(_) => {
                    let key = self.pending_keys.remove(0);
                    trace!(target: "actions.dispatch", key = %key.escape_debug(), replay = self.pending_keys.len(), "key_unmapped");
                    outcomes.push(KeyOutcome::Unmapped(key));
                }
                Resolution::Matched {
                    consumed, output, ..
                } => {
                    let rest = self.pending_keys.split_off(consumed);
                    self.pending_keys.clear();
                    trace!(target: "actions.dispatch", consumed, leftover = rest.len(), "mapping_matched");
                    match output {
                        MappingOutput::Cancel => {
                            self.pending_keys = rest;
                            outcomes.push(KeyOutcome::Cleared);
                        }
                        MappingOutput::Plug(name) => {
                            let outcome = self.start(editor, &name, rest);
                            outcomes.push(outcome);
                        }
                    }
                }
            }
        }
    }

    fn start(&mut self, editor: &mut EditorState, name: &str, keys: Vec<char>) -> KeyOutcome {
        let Some(op) = self.registry.instantiate(editor.mode, name) else {
            debug!(target: "actions.dispatch", command = name, mode = ?editor.mode, "command_unknown");
            self.pending_keys = keys;
            return KeyOutcome::Aborted(SurroundError::UnknownCommand(name.to_string()));
        };
        debug!(target: "actions.dispatch", command = op.name(), "command_started");
        let mut state = CommandState::new();
        for key in keys {
            state.push_key(key);
        }
        self.drive(ActiveCommand { op, state }, editor)
    }

    fn drive(&mut self, mut active: ActiveCommand, editor: &mut EditorState) -> KeyOutcome {
        let outcome = match active.op.feed(&mut active.state) {
            Ok(Status::NeedMore) => {
                self.active = Some(active);
                return KeyOutcome::Pending;
            }
            Ok(Status::Ready) => {
                let command = active.op.name();
                let kind = active.op.kind();
                match active.op.execute(editor) {
                    Ok(outcome) => {
                        debug!(target: "actions.dispatch", command, ?outcome, "command_executed");
                        KeyOutcome::Executed {
                            command,
                            kind,
                            outcome,
                        }
                    }
                    Err(err) => {
                        debug!(target: "actions.dispatch", command, error = %err, "command_failed");
                        KeyOutcome::Aborted(err)
                    }
                }
            }
            Err(err) => {
                debug!(target: "actions.dispatch", command = active.op.name(), error = %err, "command_aborted");
                KeyOutcome::Aborted(err)
            }
        };
        active.op.reset();
        let unread = &active.state.keys()[active.state.consumed()..];
        if !unread.is_empty() {
            trace!(target: "actions.dispatch", replay = unread.len(), "unconsumed_keys_requeued");
            let mut requeued = unread.to_vec();
            requeued.append(&mut self.pending_keys);
            self.pending_keys = requeued;
        }
        outcome
    }
}
