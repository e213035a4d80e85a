mod common;
use common::Step::*;
use common::*;

use core_actions::{KeyOutcome, SurroundOutcome};
use core_config::NotFoundPolicy;
use core_state::EditOperation;

#[test]
fn cs_paren_to_bracket() {
    let text = run_scenario("aaa (bbb) ccc", "bbb", &[Keys("cs([")]);
    assert_eq!(text, "aaa [bbb] ccc");
}

#[test]
fn cs_round_trip_restores_original() {
    let initial = "aaa (bbb) ccc";
    let text = run_scenario(initial, "bbb", &[Keys("cs(["), Keys("cs[(")]);
    assert_eq!(text, initial);
}

#[test]
fn cs_same_delimiter_leaves_text_identical() {
    for d in ["'", "\"", "(", ")", "[", "]", "{", "}"] {
        let initial = "x 'a' \"b\" (c) [d] {e}";
        let text = run_scenario(initial, "c)", &[Keys(&format!("cs{d}{d}"))]);
        assert_eq!(text, initial, "cs{d}{d} must not edit");
    }
}

#[test]
fn cs_undo_is_single_step() {
    let initial = "say 'hi' now";
    let text = run_scenario(initial, "hi", &[Keys("cs'\""), Undo]);
    assert_eq!(text, initial);
}

#[test]
fn cs_undo_redo() {
    let text = run_scenario("f(x)", "x", &[Keys("cs)}"), Undo, Redo]);
    assert_eq!(text, "f{x}");
}

#[test]
fn ds_removes_pair() {
    let text = run_scenario("aaa (bbb) ccc", "bbb", &[Keys("ds(")]);
    assert_eq!(text, "aaa bbb ccc");
}

#[test]
fn ds_undo_restores_original() {
    let initial = "aaa (bbb) ccc";
    let text = run_scenario(initial, "bbb", &[Keys("ds)"), Undo]);
    assert_eq!(text, initial);
}

#[test]
fn ds_quotes_then_cs_on_other_pair() {
    let text = run_scenario(
        "call(\"arg\")",
        "arg",
        &[Keys("ds\""), Keys("cs([")],
    );
    assert_eq!(text, "call[arg]");
}

#[test]
fn missing_closing_delimiter_is_noop() {
    let initial = "aaa 'bbb ccc";
    let text = run_scenario(initial, "bbb", &[Keys("cs'\""), Keys("ds'")]);
    assert_eq!(text, initial);
}

#[test]
fn pair_split_across_lines_is_noop() {
    let initial = "aaa (bbb\nccc) ddd";
    assert_eq!(run_scenario(initial, "bbb", &[Keys("ds(")]), initial);
    assert_eq!(run_scenario(initial, "ccc", &[Keys("cs({")]), initial);
}

#[test]
fn edits_only_cursor_line() {
    let text = run_scenario("(a)\n(b)\n(c)", "b", &[Keys("cs(]")]);
    assert_eq!(text, "(a)\n[b]\n(c)");
}

#[test]
fn executed_outcome_reports_positions_and_kind() {
    let mut editor = editor_at("aaa (bbb) ccc", "bbb");
    let mut disp = surround_dispatcher(NotFoundPolicy::Ignore);
    let out = run_keys(&mut disp, &mut editor, "cs([");
    assert_eq!(
        out,
        KeyOutcome::Executed {
            command: "CSurround",
            kind: EditOperation::Other,
            outcome: SurroundOutcome::Applied { open: 4, close: 8 },
        }
    );
    assert_eq!(editor.undo_depth(), 1);
}

#[test]
fn noop_leaves_no_undo_history() {
    let mut editor = editor_at("aaa 'bbb ccc", "bbb");
    let mut disp = surround_dispatcher(NotFoundPolicy::Ignore);
    run_keys(&mut disp, &mut editor, "ds'");
    run_keys(&mut disp, &mut editor, "cs((");
    assert_eq!(editor.undo_depth(), 0);
    assert!(!editor.dirty);
}
