#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{CommandRegistry, Dispatcher, KeyOutcome, register_surround};
use core_config::NotFoundPolicy;
use core_keymap::parse_keys;
use core_state::EditorState;
use core_text::Buffer;

/// Editor over `text` with the cursor on the first occurrence of `at`.
pub fn editor_at(text: &str, at: &str) -> EditorState {
    let byte = text.find(at).expect("cursor anchor present");
    let cursor = text[..byte].chars().count();
    EditorState::with_cursor(Buffer::new("t", text), cursor)
}

/// Dispatcher with the surround commands registered and mapped.
pub fn surround_dispatcher(policy: NotFoundPolicy) -> Dispatcher {
    let mut registry = CommandRegistry::new();
    register_surround(&mut registry, policy);
    Dispatcher::new(registry)
}

/// Feed key notation (e.g. `cs([` or `ds<Esc>`) one key at a time.
pub fn type_keys(disp: &mut Dispatcher, editor: &mut EditorState, notation: &str) -> Vec<KeyOutcome> {
    parse_keys(notation)
        .into_iter()
        .flat_map(|k| disp.handle_key(editor, k))
        .collect()
}

/// Last outcome produced while typing `notation`.
pub fn run_keys(disp: &mut Dispatcher, editor: &mut EditorState, notation: &str) -> KeyOutcome {
    type_keys(disp, editor, notation)
        .pop()
        .expect("at least one key")
}

/// Scenario step: either feed key notation or invoke undo / redo.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    Keys(&'a str),
    Undo,
    Redo,
}

/// Runs a scenario from `initial` with the cursor on `at`; returns the final text.
pub fn run_scenario(initial: &str, at: &str, steps: &[Step<'_>]) -> String {
    let mut editor = editor_at(initial, at);
    let mut disp = surround_dispatcher(NotFoundPolicy::Ignore);
    for step in steps {
        match step {
            Step::Keys(seq) => {
                type_keys(&mut disp, &mut editor, seq);
            }
            Step::Undo => {
                editor.undo();
            }
            Step::Redo => {
                editor.redo();
            }
        }
    }
    assert!(!disp.is_pending(), "scenario left input pending");
    editor.buffer().contents()
}
