//! Valuation configuration.

use crate::entities::token::Token;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding a comma-separated list of anchor symbols.
pub const ANCHOR_SYMBOLS_ENV: &str = "PAIRSTATS_ANCHOR_SYMBOLS";

/// Symbol of the default USD anchor.
pub const DEFAULT_ANCHOR_SYMBOL: &str = "USDC";

/// Configuration for USD anchor pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Symbols of tokens treated as worth exactly 1 USD.
    pub anchor_symbols: Vec<String>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            anchor_symbols: vec![DEFAULT_ANCHOR_SYMBOL.to_string()],
        }
    }
}

impl ValuationConfig {
    /// Creates a configuration with the given anchors.
    pub fn new<I, S>(anchor_symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            anchor_symbols: anchor_symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds an anchor symbol.
    #[must_use]
    pub fn with_anchor(mut self, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        if !self.anchor_symbols.contains(&symbol) {
            self.anchor_symbols.push(symbol);
        }
        self
    }

    /// Parses a comma-separated symbol list. Blank entries are skipped; an
    /// empty list falls back to the default anchor.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        let symbols: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if symbols.is_empty() {
            Self::default()
        } else {
            Self {
                anchor_symbols: symbols,
            }
        }
    }

    /// Reads anchors from [`ANCHOR_SYMBOLS_ENV`], falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        env::var(ANCHOR_SYMBOLS_ENV)
            .map(|list| Self::from_list(&list))
            .unwrap_or_default()
    }

    /// Returns true if the token's symbol is a configured anchor.
    /// Symbols match exactly, case included.
    #[must_use]
    pub fn is_anchor(&self, token: &Token) -> bool {
        self.anchor_symbols.iter().any(|s| *s == token.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    #[test]
    fn test_default_anchor_is_usdc() {
        let config = ValuationConfig::default();
        let usdc = Token::new(Address::from_bytes([1; 20]), "USDC", 6, "USD Coin");
        let lower = Token::new(Address::from_bytes([2; 20]), "usdc", 6, "fake");
        assert!(config.is_anchor(&usdc));
        assert!(!config.is_anchor(&lower));
    }

    #[test]
    fn test_from_list() {
        let config = ValuationConfig::from_list(" USDC, USDT ,,DAI");
        assert_eq!(config.anchor_symbols, vec!["USDC", "USDT", "DAI"]);
        assert_eq!(ValuationConfig::from_list(" , "), ValuationConfig::default());
    }

    #[test]
    fn test_with_anchor_deduplicates() {
        let config = ValuationConfig::default().with_anchor("USDT").with_anchor("USDC");
        assert_eq!(config.anchor_symbols, vec!["USDC", "USDT"]);
        assert_eq!(ValuationConfig::new(["DAI"]).anchor_symbols, vec!["DAI"]);
    }
}
