//! Symbols are extended grapheme clusters. Every length in the cipher is
//! counted in symbols, never in bytes or code points.

use crate::error::{CubigmaError, Result};
use std::collections::HashSet;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Split text into user-perceived symbols
pub fn split_symbols(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_owned).collect()
}

/// Number of symbols in `text`
pub fn user_perceived_length(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Whether `text` is exactly one symbol
pub fn is_single_symbol(text: &str) -> bool {
    user_perceived_length(text) == 1
}

/// Ordered list of unique symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<String>,
}

impl Alphabet {
    pub fn new(symbols: Vec<String>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(CubigmaError::validation("alphabet", "no symbols"));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !is_single_symbol(symbol) {
                return Err(CubigmaError::validation(
                    "alphabet",
                    format!("{:?} is not a single symbol", symbol),
                ));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(CubigmaError::validation(
                    "alphabet",
                    format!("duplicate symbol {:?}", symbol),
                ));
            }
        }
        Ok(Self { symbols })
    }

    /// One symbol per non-empty line; the two characters `\n` stand for a newline
    pub fn from_lines(text: &str) -> Result<Self> {
        let symbols = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                if line == "\\n" {
                    "\n".to_string()
                } else {
                    line.to_string()
                }
            })
            .collect();
        Self::new(symbols)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_lines(&std::fs::read_to_string(path)?)
    }

    /// Built-in alphabet of exactly `volume` symbols
    ///
    /// Order: default markers, digits, newline, space, letters, the rest of
    /// printable ASCII, then Latin-1 and Latin Extended letters up to the
    /// combining diacritics block.
    pub fn standard(volume: usize) -> Result<Self> {
        let mut pool: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut push = |s: String, pool: &mut Vec<String>| {
            if seen.insert(s.clone()) {
                pool.push(s);
            }
        };

        let markers = crate::config::Markers::default();
        for s in markers.all() {
            push(s.to_string(), &mut pool);
        }
        for c in '0'..='9' {
            push(c.to_string(), &mut pool);
        }
        push("\n".to_string(), &mut pool);
        for c in std::iter::once(' ').chain('a'..='z').chain('A'..='Z').chain(' '..='~') {
            push(c.to_string(), &mut pool);
        }
        for code in 0xA1u32..0x300 {
            if code == 0xAD {
                continue;
            }
            if let Some(c) = char::from_u32(code) {
                push(c.to_string(), &mut pool);
            }
        }

        if pool.len() < volume {
            return Err(CubigmaError::DimensionMismatch {
                symbols: pool.len(),
                volume,
            });
        }
        pool.truncate(volume);
        Self::new(pool)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

/// Normalise line endings and drop reserved symbols
pub fn sanitize(message: &str, reserved: &[&str]) -> String {
    let normalised = message.replace("\r\n", "\n");
    normalised
        .graphemes(true)
        .filter(|g| !reserved.contains(g))
        .collect()
}
