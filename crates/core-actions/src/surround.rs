//! Surround change/delete executors.
//!
//! Both executors locate the pair around the cursor first and only mutate
//! once both halves are known, so a miss on either side leaves the text
//! untouched. Grouping the two single-char patches into one undo step is the
//! caller's job (`EditorState::edit`).

use crate::delimiter::{DelimiterPair, lookup};
use crate::error::{Side, SurroundError};
use crate::locator::{Direction, locate};
use core_config::NotFoundPolicy;
use core_text::TextView;
use tracing::debug;

/// Observable result of a surround executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurroundOutcome {
    /// Both delimiters were patched; offsets are as located before the edit.
    Applied { open: usize, close: usize },
    /// Change with identical old and new delimiters.
    Unchanged,
    /// One side of the pair is missing from the cursor line; nothing was mutated.
    NotFound { side: Side, delimiter: char },
}

impl SurroundOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SurroundOutcome::Applied { .. })
    }
}

/// Locate both halves of `pair` around `cursor`.
///
/// A symmetric pair whose backward and forward scans hit the same char (cursor
/// resting on a quote) does not count as a pair.
fn find_pair<V: TextView + ?Sized>(
    view: &V,
    cursor: usize,
    pair: DelimiterPair,
) -> Result<(usize, usize), SurroundOutcome> {
    let open = locate(view, cursor, pair.open, Direction::Backward).ok_or(
        SurroundOutcome::NotFound {
            side: Side::Open,
            delimiter: pair.open,
        },
    )?;
    let close = locate(view, cursor, pair.close, Direction::Forward)
        .filter(|&close| !(pair.is_symmetric() && close == open))
        .ok_or(SurroundOutcome::NotFound {
            side: Side::Close,
            delimiter: pair.close,
        })?;
    Ok((open, close))
}

/// Replace the `old` pair around `cursor` with the `new` pair.
pub fn change_surround<V: TextView + ?Sized>(
    view: &mut V,
    cursor: usize,
    old: char,
    new: char,
) -> Result<SurroundOutcome, SurroundError> {
    if old == new {
        debug!(target: "actions.surround", op = "change", old = %old, "surround_unchanged");
        return Ok(SurroundOutcome::Unchanged);
    }
    let from = lookup(old).ok_or(SurroundError::UnknownDelimiter(old))?;
    let to = lookup(new).ok_or(SurroundError::UnknownDelimiter(new))?;
    let (open, close) = match find_pair(view, cursor, from) {
        Ok(found) => found,
        Err(miss) => {
            debug!(target: "actions.surround", op = "change", cursor, outcome = ?miss, "surround_not_found");
            return Ok(miss);
        }
    };
    view.replace_char(open, to.open)?;
    view.replace_char(close, to.close)?;
    debug!(target: "actions.surround", op = "change", open, close, old = %old, new = %new, "surround_applied");
    Ok(SurroundOutcome::Applied { open, close })
}

/// Erase the `old` pair around `cursor`.
pub fn delete_surround<V: TextView + ?Sized>(
    view: &mut V,
    cursor: usize,
    old: char,
) -> Result<SurroundOutcome, SurroundError> {
    let pair = lookup(old).ok_or(SurroundError::UnknownDelimiter(old))?;
    let (open, close) = match find_pair(view, cursor, pair) {
        Ok(found) => found,
        Err(miss) => {
            debug!(target: "actions.surround", op = "delete", cursor, outcome = ?miss, "surround_not_found");
            return Ok(miss);
        }
    };
    // Closing side first: `open < close`, so erasing it leaves `open` valid.
    view.erase_char(close)?;
    view.erase_char(open)?;
    debug!(target: "actions.surround", op = "delete", open, close, old = %old, "surround_applied");
    Ok(SurroundOutcome::Applied { open, close })
}

/// Apply the configured locator-miss policy to an executor outcome.
pub fn enforce_policy(
    outcome: SurroundOutcome,
    policy: NotFoundPolicy,
) -> Result<SurroundOutcome, SurroundError> {
    match (outcome, policy) {
        (SurroundOutcome::NotFound { side, delimiter }, NotFoundPolicy::Abort) => {
            Err(SurroundError::NotFound { side, delimiter })
        }
        _ => Ok(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiter::keys;
    use core_text::Buffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn change_replaces_both_delimiters() {
        let mut b = Buffer::new("t", "aaa (bbb) ccc");
        let out = change_surround(&mut b, 5, '(', '[').unwrap();
        assert_eq!(out, SurroundOutcome::Applied { open: 4, close: 8 });
        assert_eq!(b.contents(), "aaa [bbb] ccc");
    }

    #[test]
    fn change_accepts_closing_trigger_keys() {
        let mut b = Buffer::new("t", "x {y} z");
        change_surround(&mut b, 3, '}', ')').unwrap();
        assert_eq!(b.contents(), "x (y) z");
    }

    #[test]
    fn change_quotes_to_brackets() {
        let mut b = Buffer::new("t", "say 'hi' now");
        change_surround(&mut b, 6, '\'', '"').unwrap();
        assert_eq!(b.contents(), "say \"hi\" now");
        change_surround(&mut b, 6, '"', '{').unwrap();
        assert_eq!(b.contents(), "say {hi} now");
    }

    #[test]
    fn change_same_delimiter_is_noop() {
        for d in keys() {
            let mut b = Buffer::new("t", "aaa (bbb) 'c' [d] {e} \"f\"");
            let before = b.contents();
            let out = change_surround(&mut b, 6, d, d).unwrap();
            assert_eq!(out, SurroundOutcome::Unchanged);
            assert_eq!(b.contents(), before);
        }
    }

    #[test]
    fn change_round_trip_restores_text() {
        let original = "aaa (bbb) ccc";
        let mut b = Buffer::new("t", original);
        change_surround(&mut b, 5, '(', '[').unwrap();
        change_surround(&mut b, 5, '[', '(').unwrap();
        assert_eq!(b.contents(), original);
    }

    #[test]
    fn missing_closing_delimiter_is_noop() {
        let mut b = Buffer::new("t", "aaa 'bbb ccc");
        let out = change_surround(&mut b, 5, '\'', '"').unwrap();
        assert_eq!(
            out,
            SurroundOutcome::NotFound {
                side: Side::Close,
                delimiter: '\''
            }
        );
        let out = delete_surround(&mut b, 5, '\'').unwrap();
        assert!(!out.is_applied());
        assert_eq!(b.contents(), "aaa 'bbb ccc");
    }

    #[test]
    fn missing_opening_delimiter_is_noop() {
        let mut b = Buffer::new("t", "aaa bbb) ccc");
        let out = delete_surround(&mut b, 5, ')').unwrap();
        assert_eq!(
            out,
            SurroundOutcome::NotFound {
                side: Side::Open,
                delimiter: '('
            }
        );
        assert_eq!(b.contents(), "aaa bbb) ccc");
    }

    #[test]
    fn delete_removes_both_delimiters() {
        let mut b = Buffer::new("t", "aaa (bbb) ccc");
        let out = delete_surround(&mut b, 5, '(').unwrap();
        assert_eq!(out, SurroundOutcome::Applied { open: 4, close: 8 });
        assert_eq!(b.contents(), "aaa bbb ccc");
    }

    #[test]
    fn delete_nearest_enclosing_on_line() {
        let mut b = Buffer::new("t", "f(a, (b), c)");
        // Cursor on 'c': nearest '(' backward is the inner one, nearest ')' forward the outer one.
        let out = delete_surround(&mut b, 10, '(').unwrap();
        assert_eq!(out, SurroundOutcome::Applied { open: 5, close: 11 });
        assert_eq!(b.contents(), "f(a, b), c");
    }

    #[test]
    fn pair_on_other_lines_is_ignored() {
        let mut b = Buffer::new("t", "(\nbbb\n)");
        let out = delete_surround(&mut b, 3, '(').unwrap();
        assert!(!out.is_applied());
        assert_eq!(b.contents(), "(\nbbb\n)");
    }

    #[test]
    fn cursor_on_lone_quote_is_not_a_pair() {
        let mut b = Buffer::new("t", "it's here");
        let out = delete_surround(&mut b, 2, '\'').unwrap();
        assert_eq!(
            out,
            SurroundOutcome::NotFound {
                side: Side::Close,
                delimiter: '\''
            }
        );
        assert_eq!(b.contents(), "it's here");
    }

    #[test]
    fn unknown_delimiter_is_error() {
        let mut b = Buffer::new("t", "<a>");
        assert_eq!(
            change_surround(&mut b, 1, '<', '('),
            Err(SurroundError::UnknownDelimiter('<'))
        );
        assert_eq!(
            change_surround(&mut b, 1, '(', '<'),
            Err(SurroundError::UnknownDelimiter('<'))
        );
        assert_eq!(
            delete_surround(&mut b, 1, '<'),
            Err(SurroundError::UnknownDelimiter('<'))
        );
    }

    #[test]
    fn policy_enforcement() {
        let miss = SurroundOutcome::NotFound {
            side: Side::Open,
            delimiter: '[',
        };
        assert_eq!(enforce_policy(miss, NotFoundPolicy::Ignore), Ok(miss));
        assert_eq!(
            enforce_policy(miss, NotFoundPolicy::Abort),
            Err(SurroundError::NotFound {
                side: Side::Open,
                delimiter: '['
            })
        );
        assert_eq!(
            enforce_policy(SurroundOutcome::Unchanged, NotFoundPolicy::Abort),
            Ok(SurroundOutcome::Unchanged)
        );
    }
}
