use crate::error::{CubigmaError, Result};
use crate::symbols::split_symbols;
use std::collections::HashMap;

/// Explicit symbol swaps. Unlisted symbols pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plugboard {
    swaps: HashMap<String, String>,
}

impl Plugboard {
    /// Build from pair strings such as `"ab"` or `"👍🏽x"`
    pub fn generate<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        let mut swaps = HashMap::with_capacity(pairs.len() * 2);
        for pair in pairs {
            let pair = pair.as_ref();
            let symbols = split_symbols(pair);
            let [a, b] = symbols.as_slice() else {
                return Err(CubigmaError::validation(
                    "plugboard",
                    format!("{:?} must be exactly two symbols", pair),
                ));
            };
            for symbol in [a, b] {
                if swaps.contains_key(symbol) || a == b {
                    return Err(CubigmaError::validation(
                        "plugboard",
                        format!("symbol {:?} used more than once", symbol),
                    ));
                }
            }
            swaps.insert(a.clone(), b.clone());
            swaps.insert(b.clone(), a.clone());
        }
        Ok(Self { swaps })
    }

    /// Swap partner, or the symbol itself when unplugged
    pub fn swap<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.swaps.get(symbol).map(String::as_str).unwrap_or(symbol)
    }

    /// Every plugged symbol
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.swaps.keys().map(String::as_str)
    }

    pub fn mapping(&self) -> &HashMap<String, String> {
        &self.swaps
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }
}
