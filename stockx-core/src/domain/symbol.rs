//! Ordered, de-duplicated symbol selection.

use serde::{Deserialize, Serialize};

/// Ordered set of distinct ticker strings.
///
/// Symbols are case-sensitive as supplied; surrounding whitespace is trimmed
/// and blank entries are dropped. An empty set is the explicit "no selection"
/// state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolSet {
    symbols: Vec<String>,
}

impl SymbolSet {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for symbol in symbols {
            set.insert(symbol.as_ref());
        }
        set
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a symbol if not already present. Returns true if inserted.
    pub fn insert(&mut self, symbol: &str) -> bool {
        let symbol = symbol.trim();
        if symbol.is_empty() || self.contains(symbol) {
            return false;
        }
        self.symbols.push(symbol.to_string());
        true
    }

    /// Remove a symbol. Returns true if it was present.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| s != symbol);
        self.symbols.len() != before
    }

    /// Select or deselect, keeping selection order for newly added symbols.
    pub fn toggle(&mut self, symbol: &str) {
        if !self.remove(symbol) {
            self.insert(symbol);
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.symbols.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }
}

impl From<Vec<String>> for SymbolSet {
    fn from(symbols: Vec<String>) -> Self {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<String> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}

impl<S: AsRef<str>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
