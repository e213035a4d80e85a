//! Key collectors for the surround commands.
//!
//! A command is driven by the dispatcher through the [`Operator`] lifecycle:
//! `feed` is called every time new keys arrive until it reports
//! [`Status::Ready`], then `execute` runs once, then `reset` always runs
//! (also after an abort). Collection is resumable: a collector keeps the keys
//! gathered so far between `feed` calls and never blocks waiting for input.
//!
//! `SurroundChange` (`cs`) needs two delimiter keys, `SurroundDelete` (`ds`)
//! needs one. Keys outside the delimiter table abort the command with
//! `SurroundError::InvalidDelimiter`.

use crate::delimiter::is_delimiter;
use crate::error::SurroundError;
use crate::surround::{SurroundOutcome, change_surround, delete_surround, enforce_policy};
use core_config::NotFoundPolicy;
use core_state::{CommandState, EditOperation, EditorState};
use core_text::TextView;
use tracing::debug;

/// Result of feeding input to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NeedMore,
    Ready,
}

/// Host-facing command lifecycle.
pub trait Operator {
    /// Stable command name (the `<Plug>` name it is registered under).
    fn name(&self) -> &'static str;

    /// Edit classification for yank/undo bookkeeping.
    fn kind(&self) -> EditOperation;

    /// Consume available keys from `state`, asking for more through its flags.
    fn feed(&mut self, state: &mut CommandState) -> Result<Status, SurroundError>;

    /// Apply the command to the editor. Only valid after `feed` returned `Ready`.
    fn execute(&mut self, editor: &mut EditorState) -> Result<SurroundOutcome, SurroundError>;

    /// Forget collected input. Idempotent.
    fn reset(&mut self);
}

/// Where a collector is in its input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStage {
    AwaitingOld,
    AwaitingNew,
    Ready,
}

/// Read one delimiter key from `state`.
///
/// `Ok(None)` means the stream is exhausted: `more_input` has been raised (plus
/// `accepting_any_input` when `accept_any` is set) and nothing was consumed.
fn next_delimiter(
    state: &mut CommandState,
    accept_any: bool,
) -> Result<Option<char>, SurroundError> {
    let Some(key) = state.next() else {
        state.more_input = true;
        if accept_any {
            state.accepting_any_input = true;
        }
        return Ok(None);
    };
    if !is_delimiter(key) {
        return Err(SurroundError::InvalidDelimiter(key));
    }
    Ok(Some(key))
}

fn mark_ready(state: &mut CommandState) {
    state.more_input = false;
    state.accepting_any_input = false;
}

/// `cs<old><new>`: replace the `old` pair around the cursor with `new`.
#[derive(Debug, Clone, Default)]
pub struct SurroundChange {
    old: Option<char>,
    new: Option<char>,
    policy: NotFoundPolicy,
}

impl SurroundChange {
    pub const NAME: &'static str = "CSurround";

    pub fn new(policy: NotFoundPolicy) -> Self {
        Self {
            old: None,
            new: None,
            policy,
        }
    }

    pub fn old(&self) -> Option<char> {
        self.old
    }

    pub fn new_delimiter(&self) -> Option<char> {
        self.new
    }

    pub fn stage(&self) -> CollectorStage {
        match (self.old, self.new) {
            (None, _) => CollectorStage::AwaitingOld,
            (Some(_), None) => CollectorStage::AwaitingNew,
            (Some(_), Some(_)) => CollectorStage::Ready,
        }
    }
}

impl Operator for SurroundChange {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> EditOperation {
        EditOperation::Other
    }

    fn feed(&mut self, state: &mut CommandState) -> Result<Status, SurroundError> {
        loop {
            match self.stage() {
                CollectorStage::AwaitingOld => {
                    // The first key may double as a bracket-namespace key in the host
                    // grammar, so ask for it verbatim.
                    let Some(key) = next_delimiter(state, true)? else {
                        debug!(target: "actions.collect", command = Self::NAME, stage = "old", "need_more_input");
                        return Ok(Status::NeedMore);
                    };
                    self.old = Some(key);
                    debug!(target: "actions.collect", command = Self::NAME, old = %key, "old_collected");
                }
                CollectorStage::AwaitingNew => {
                    let Some(key) = next_delimiter(state, true)? else {
                        debug!(target: "actions.collect", command = Self::NAME, stage = "new", "need_more_input");
                        return Ok(Status::NeedMore);
                    };
                    self.new = Some(key);
                    debug!(target: "actions.collect", command = Self::NAME, new = %key, "new_collected");
                }
                CollectorStage::Ready => {
                    mark_ready(state);
                    return Ok(Status::Ready);
                }
            }
        }
    }

    fn execute(&mut self, editor: &mut EditorState) -> Result<SurroundOutcome, SurroundError> {
        let (Some(old), Some(new)) = (self.old, self.new) else {
            return Err(SurroundError::Incomplete);
        };
        let outcome = editor.edit(|buf, cursor| change_surround(buf, *cursor, old, new))?;
        enforce_policy(outcome, self.policy)
    }

    fn reset(&mut self) {
        self.old = None;
        self.new = None;
    }
}

/// `ds<old>`: erase the `old` pair around the cursor.
#[derive(Debug, Clone, Default)]
pub struct SurroundDelete {
    old: Option<char>,
    policy: NotFoundPolicy,
}

impl SurroundDelete {
    pub const NAME: &'static str = "DSurround";

    pub fn new(policy: NotFoundPolicy) -> Self {
        Self { old: None, policy }
    }

    pub fn old(&self) -> Option<char> {
        self.old
    }

    pub fn stage(&self) -> CollectorStage {
        match self.old {
            None => CollectorStage::AwaitingOld,
            Some(_) => CollectorStage::Ready,
        }
    }
}

impl Operator for SurroundDelete {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> EditOperation {
        EditOperation::Other
    }

    fn feed(&mut self, state: &mut CommandState) -> Result<Status, SurroundError> {
        if self.old.is_none() {
            let Some(key) = next_delimiter(state, false)? else {
                debug!(target: "actions.collect", command = Self::NAME, stage = "old", "need_more_input");
                return Ok(Status::NeedMore);
            };
            self.old = Some(key);
            debug!(target: "actions.collect", command = Self::NAME, old = %key, "old_collected");
        }
        mark_ready(state);
        Ok(Status::Ready)
    }

    fn execute(&mut self, editor: &mut EditorState) -> Result<SurroundOutcome, SurroundError> {
        let Some(old) = self.old else {
            return Err(SurroundError::Incomplete);
        };
        let outcome = editor.edit(|buf, cursor| {
            let outcome = delete_surround(buf, *cursor, old)?;
            if let SurroundOutcome::Applied { open, .. } = outcome {
                // Erasing the opening delimiter shifts everything after it left by one.
                if open < *cursor {
                    *cursor -= 1;
                }
                // Cursor sat on the erased closing delimiter at the end of the line.
                let bounds = buf.line_bounds(*cursor);
                if !bounds.contains(*cursor) && !bounds.is_empty() {
                    *cursor = bounds.end - 1;
                }
            }
            Ok::<_, SurroundError>(outcome)
        })?;
        enforce_policy(outcome, self.policy)
    }

    fn reset(&mut self) {
        self.old = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    #[test]
    fn change_starts_unset() {
        let cmd = SurroundChange::default();
        assert_eq!(cmd.name(), "CSurround");
        assert_eq!(cmd.kind(), EditOperation::Other);
        assert_eq!(cmd.old(), None);
        assert_eq!(cmd.new_delimiter(), None);
        assert_eq!(cmd.stage(), CollectorStage::AwaitingOld);
    }

    #[test]
    fn change_resumes_across_feeds() {
        let mut cmd = SurroundChange::default();
        let mut st = CommandState::new();
        assert_eq!(cmd.feed(&mut st), Ok(Status::NeedMore));
        st.push_key('(');
        assert_eq!(cmd.feed(&mut st), Ok(Status::NeedMore));
        assert_eq!(cmd.stage(), CollectorStage::AwaitingNew);
        assert!(st.more_input);
        assert!(st.accepting_any_input);
        st.push_key('[');
        assert_eq!(cmd.feed(&mut st), Ok(Status::Ready));
        assert!(!st.more_input);
        assert_eq!((cmd.old(), cmd.new_delimiter()), (Some('('), Some('[')));
    }

    #[test]
    fn delete_does_not_accept_any_input() {
        let mut cmd = SurroundDelete::default();
        let mut st = CommandState::new();
        assert_eq!(cmd.feed(&mut st), Ok(Status::NeedMore));
        assert!(st.more_input);
        assert!(!st.accepting_any_input);
    }

    #[test]
    fn execute_before_ready_is_incomplete() {
        let mut ed = EditorState::new(Buffer::new("t", "(a)"));
        assert_eq!(
            SurroundChange::default().execute(&mut ed),
            Err(SurroundError::Incomplete)
        );
        assert_eq!(
            SurroundDelete::default().execute(&mut ed),
            Err(SurroundError::Incomplete)
        );
    }

    #[test]
    fn delete_shifts_cursor_past_erased_opening() {
        let mut ed = EditorState::with_cursor(Buffer::new("t", "aaa (bbb) ccc"), 6);
        let mut cmd = SurroundDelete::default();
        let mut st = CommandState::with_keys("(");
        assert_eq!(cmd.feed(&mut st), Ok(Status::Ready));
        cmd.execute(&mut ed).unwrap();
        assert_eq!(ed.buffer().contents(), "aaa bbb ccc");
        assert_eq!(ed.cursor, 5);
    }

    #[test]
    fn delete_keeps_cursor_on_line_when_closing_erased() {
        let mut ed = EditorState::with_cursor(Buffer::new("t", "(ab)\nnext"), 3);
        let mut cmd = SurroundDelete::default();
        cmd.feed(&mut CommandState::with_keys(")")).unwrap();
        cmd.execute(&mut ed).unwrap();
        assert_eq!(ed.buffer().contents(), "ab\nnext");
        assert_eq!(ed.cursor, 1);

        let mut ed = EditorState::with_cursor(Buffer::new("t", "(ab)"), 3);
        cmd.reset();
        cmd.feed(&mut CommandState::with_keys("(")).unwrap();
        cmd.execute(&mut ed).unwrap();
        assert_eq!(ed.buffer().contents(), "ab");
        assert_eq!(ed.cursor, 1);
    }

    #[test]
    fn delete_cursor_on_closing_mid_line_moves_to_following_char() {
        let mut ed = EditorState::with_cursor(Buffer::new("t", "x (ab) y"), 5);
        let mut cmd = SurroundDelete::default();
        cmd.feed(&mut CommandState::with_keys("(")).unwrap();
        cmd.execute(&mut ed).unwrap();
        assert_eq!(ed.buffer().contents(), "x ab y");
        assert_eq!(ed.cursor, 4);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut cmd = SurroundChange::default();
        let mut st = CommandState::with_keys("'\"");
        cmd.feed(&mut st).unwrap();
        cmd.reset();
        cmd.reset();
        assert_eq!(cmd.stage(), CollectorStage::AwaitingOld);
    }
}
