use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Field, FieldViolation};

/// Trading pair symbol, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, FieldViolation> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FieldViolation::new(Field::Symbol, "symbol cannot be empty"));
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = FieldViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = FieldViolation;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Symbols the venue currently reports as tradable.
///
/// Fetched fresh for each invocation. An empty set means the venue answered
/// with zero tradable symbols, which is different from not knowing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolSet(BTreeSet<String>);

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol.as_str())
    }

    pub fn insert(&mut self, symbol: impl Into<String>) -> bool {
        self.0.insert(symbol.into().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for symbol in iter {
            set.insert(symbol);
        }
        set
    }
}
