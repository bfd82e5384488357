use crate::error::{GeneratorError, Result};
use burrow_core::shortcode::is_code_byte;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The alphabet every previously issued code was drawn from.
///
/// Note the digit run ends in `10`, so `1` appears twice.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ12345678910";

/// Largest alphabet a single random byte can index.
pub const MAX_SYMBOLS: usize = 256;

/// An ordered, non-empty sequence of code symbols.
///
/// Symbols are restricted to `[a-zA-Z0-9_-]` so every synthesized code is a
/// valid [`ShortCode`](burrow_core::ShortCode). Repeated symbols are allowed;
/// they keep their positions and therefore their extra weight.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    pub fn new(symbols: impl AsRef<str>) -> Result<Self> {
        let symbols = symbols.as_ref().as_bytes();

        if symbols.is_empty() {
            return Err(GeneratorError::InvalidAlphabet(
                "alphabet cannot be empty".to_string(),
            ));
        }

        if symbols.len() > MAX_SYMBOLS {
            return Err(GeneratorError::InvalidAlphabet(format!(
                "alphabet has {} symbols; at most {} are supported",
                symbols.len(),
                MAX_SYMBOLS
            )));
        }

        if let Some(bad) = symbols.iter().find(|b| !is_code_byte(**b)) {
            return Err(GeneratorError::InvalidAlphabet(format!(
                "symbol {:?} is not alphanumeric, '-' or '_'",
                char::from(*bad)
            )));
        }

        Ok(Self {
            symbols: symbols.to_vec(),
        })
    }

    /// Number of symbol positions, duplicates included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; alphabets are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`, or `None` if out of range.
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Returns the symbols that occur more than once, in first-seen order.
    pub fn duplicates(&self) -> Vec<char> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.symbols
            .iter()
            .filter(|b| !seen.insert(**b) && reported.insert(**b))
            .map(|b| char::from(*b))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        // Validated as ASCII in `new`.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.as_bytes().to_vec(),
        }
    }
}

impl FromStr for Alphabet {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
