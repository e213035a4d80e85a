//! Surround editing commands: change (`cs<old><new>`) and delete (`ds<old>`)
//! the delimiter pair flanking the cursor on the current line.
//!
//! Layers, bottom-up:
//! * `delimiter` - the static delimiter pair table.
//! * `locator`   - single-line char scan from the cursor.
//! * `surround`  - change/delete executors over any `TextView`.
//! * `operator`  - key collectors (`SurroundChange`, `SurroundDelete`)
//!   implementing the `Operator` lifecycle (`feed` / `execute` / `reset`).
//! * `registry`  - `<Plug>` command registration and key mappings.
//! * `dispatcher` - drives keys through mappings and the operator lifecycle.
//!
//! Locator misses are not errors by default: the executors report them as
//! `SurroundOutcome::NotFound` and leave the buffer untouched. The
//! `NotFoundPolicy::Abort` configuration turns them into
//! `SurroundError::NotFound` at the operator boundary.

pub mod delimiter;
pub mod dispatcher;
mod error;
pub mod locator;
pub mod operator;
pub mod registry;
pub mod surround;

pub use delimiter::{DelimiterPair, is_delimiter, lookup};
pub use dispatcher::{Dispatcher, KeyOutcome};
pub use error::{Side, SurroundError};
pub use locator::{Direction, locate};
pub use operator::{CollectorStage, Operator, Status, SurroundChange, SurroundDelete};
pub use registry::{CommandRegistry, OperatorFactory, register_surround, surround_commands};
pub use surround::{SurroundOutcome, change_surround, delete_surround, enforce_policy};
