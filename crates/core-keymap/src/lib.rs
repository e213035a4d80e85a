//! core-keymap: key sequence mapping engine.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the typed keys.
//! - Mappings compiled into a compressed trie for cache locality.
//! - Ambiguity surfaced by returning `NeedMore` when the typed keys are a
//!   strict prefix of one or more mappings and no terminal mapping has yet
//!   been confirmed.
//! - No side effects: logging only at TRACE for traversal steps.
//!
//! Mapping right-hand sides name commands symbolically with the `<Plug>`
//! notation (`cs` → `<Plug>CSurround`). The command registry resolves the
//! plug name to a concrete command; this crate never sees command types.

use smallvec::SmallVec;
use tracing::trace;

/// Prefix marking a symbolic command name on a mapping's right-hand side.
pub const PLUG_PREFIX: &str = "<Plug>";

/// The escape key as delivered to the dispatcher.
pub const ESC: char = '\u{1b}';

// -------------------------------------------------------------------------------------------------
// Public Symbolic Output
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MappingOutput {
    /// Run the command registered under this plug name (prefix stripped).
    Plug(String),
    /// Abandon whatever is pending.
    Cancel,
}

/// Strip the `<Plug>` prefix, returning the bare command name.
pub fn plug_name(rhs: &str) -> Option<&str> {
    rhs.strip_prefix(PLUG_PREFIX).filter(|name| !name.is_empty())
}

/// Expand key notation into raw keys. Supports plain chars plus `<Esc>` and `<lt>`.
pub fn parse_keys(notation: &str) -> Vec<char> {
    let mut keys = Vec::new();
    let mut rest = notation;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(tail) = rest.strip_prefix("<Esc>") {
                keys.push(ESC);
                rest = tail;
                continue;
            }
            if let Some(tail) = rest.strip_prefix("<lt>") {
                keys.push('<');
                rest = tail;
                continue;
            }
        }
        keys.push(c);
        rest = &rest[c.len_utf8()..];
    }
    keys
}

// -------------------------------------------------------------------------------------------------
// Key Token Pattern
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyTokenPattern {
    Char(char),
}

impl KeyTokenPattern {
    fn matches(&self, ch: char) -> bool {
        match self {
            KeyTokenPattern::Char(c) => *c == ch,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Mapping Specification
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSpec {
    pub sequence: Vec<KeyTokenPattern>,
    pub output: MappingOutput,
}

impl MappingSpec {
    pub fn new(lhs: &str, output: MappingOutput) -> Self {
        Self {
            sequence: parse_keys(lhs)
                .into_iter()
                .map(KeyTokenPattern::Char)
                .collect(),
            output,
        }
    }

    /// Build a `lhs → <Plug>Name` mapping. Returns `None` when `rhs` is not a plug name
    /// or `lhs` is empty.
    pub fn plug(lhs: &str, rhs: &str) -> Option<Self> {
        let name = plug_name(rhs)?;
        let spec = Self::new(lhs, MappingOutput::Plug(name.to_string()));
        if spec.sequence.is_empty() {
            return None;
        }
        Some(spec)
    }
}

// -------------------------------------------------------------------------------------------------
// Trie Representation
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
struct Edge {
    pat: KeyTokenPattern,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<usize>, // index into mappings vec
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

#[derive(Debug)]
pub struct MappingTrie {
    nodes: Vec<Node>,
    mappings: Vec<MappingSpec>,
}

impl MappingTrie {
    pub fn build(specs: Vec<MappingSpec>) -> Self {
        let mut trie = MappingTrie {
            nodes: vec![Node::new()],
            mappings: specs,
        };
        for (idx, m) in trie.mappings.iter().enumerate() {
            let mut cur = 0usize;
            for pat in &m.sequence {
                // find or create edge
                let next = if let Some(e) = trie.nodes[cur].edges.iter().find(|e| e.pat == *pat) {
                    e.next
                } else {
                    let new_idx = trie.nodes.len();
                    trie.nodes.push(Node::new());
                    trie.nodes[cur].edges.push(Edge {
                        pat: pat.clone(),
                        next: new_idx,
                    });
                    new_idx
                };
                cur = next;
            }
            if trie.nodes[cur].terminal.is_some() {
                // Conflict: later mapping overrides earlier; log at trace.
                trace!(
                    target: "input.map",
                    mapping_index = idx,
                    node = cur,
                    "terminal_override"
                );
            }
            trie.nodes[cur].terminal = Some(idx);
        }
        trie
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn resolve(&self, buffer: &[char]) -> Resolution {
        let mut node_idx = 0usize;
        let mut consumed_all = true;
        let mut last_terminal: Option<(usize, usize)> = None; // (consumed, mapping index)
        for (i, ch) in buffer.iter().enumerate() {
            let next = self.nodes[node_idx]
                .edges
                .iter()
                .find(|edge| edge.pat.matches(*ch))
                .map(|edge| edge.next);
            match next {
                Some(next) => {
                    node_idx = next;
                    trace!(target: "input.map", step = i, ch = %ch, node = node_idx, "advance");
                    if let Some(mi) = self.nodes[node_idx].terminal {
                        last_terminal = Some((i + 1, mi));
                    }
                }
                None => {
                    consumed_all = false;
                    break;
                }
            }
        }
        if let Some((consumed, mi)) = last_terminal {
            Resolution::Matched {
                consumed,
                output: self.mappings[mi].output.clone(),
                ambiguous: consumed_all && !self.nodes[node_idx].edges.is_empty(),
            }
        } else if buffer.is_empty() {
            Resolution::NeedMore
        } else if consumed_all && !self.nodes[node_idx].edges.is_empty() {
            Resolution::NeedMore
        } else {
            Resolution::FallbackLiteral(buffer[0])
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Resolution Result
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        consumed: usize,
        output: MappingOutput,
        ambiguous: bool,
    },
    NeedMore, // strict prefix of one or more mappings
    FallbackLiteral(char),
}

// -------------------------------------------------------------------------------------------------
// Baseline Normal Mode Mapping Specs
// -------------------------------------------------------------------------------------------------
pub fn baseline_normal_specs() -> Vec<MappingSpec> {
    vec![MappingSpec::new("<Esc>", MappingOutput::Cancel)]
}
