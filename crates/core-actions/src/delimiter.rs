//! Static delimiter pair table.
//!
//! Either character of a bracket pair selects the same pair, so `(` and `)`
//! both resolve to `('(', ')')`. Quotes pair with themselves.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterPair {
    pub open: char,
    pub close: char,
}

impl DelimiterPair {
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// True for pairs whose open and close chars are the same (quotes).
    pub fn is_symmetric(&self) -> bool {
        self.open == self.close
    }
}

static DELIMITERS: &[(char, DelimiterPair)] = &[
    ('\'', DelimiterPair::new('\'', '\'')),
    ('"', DelimiterPair::new('"', '"')),
    ('(', DelimiterPair::new('(', ')')),
    (')', DelimiterPair::new('(', ')')),
    ('[', DelimiterPair::new('[', ']')),
    (']', DelimiterPair::new('[', ']')),
    ('{', DelimiterPair::new('{', '}')),
    ('}', DelimiterPair::new('{', '}')),
];

/// Pair selected by a trigger key.
pub fn lookup(key: char) -> Option<DelimiterPair> {
    DELIMITERS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, pair)| *pair)
}

pub fn is_delimiter(key: char) -> bool {
    lookup(key).is_some()
}

/// Every supported trigger key, in table order.
pub fn keys() -> impl Iterator<Item = char> {
    DELIMITERS.iter().map(|(k, _)| *k)
}
