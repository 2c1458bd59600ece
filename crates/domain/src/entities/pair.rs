use crate::address::Address;
use crate::entities::token::Token;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Position of a token within a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Token0,
    Token1,
}

impl Side {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Token0 => Self::Token1,
            Self::Token1 => Self::Token0,
        }
    }
}

/// An AMM trading pair.
///
/// Reserve and price fields everywhere downstream are positionally bound to
/// `token0`/`token1`, so the order is fixed at construction and the tokens are
/// only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PairFields")]
pub struct Pair {
    /// Ordering index used for deterministic listing.
    pub index: i64,
    pub address: Address,
    token0: Token,
    token1: Token,
}

/// Deserialized fields of a pair, checked by [`Pair::new`].
#[derive(Deserialize)]
struct PairFields {
    index: i64,
    address: Address,
    token0: Token,
    token1: Token,
}

impl TryFrom<PairFields> for Pair {
    type Error = DomainError;

    fn try_from(fields: PairFields) -> Result<Self, Self::Error> {
        Self::new(fields.index, fields.address, fields.token0, fields.token1)
    }
}

impl Pair {
    /// Creates a pair.
    ///
    /// # Errors
    /// Returns [`DomainError::IdenticalTokens`] if both tokens share an address.
    pub fn new(
        index: i64,
        address: Address,
        token0: Token,
        token1: Token,
    ) -> Result<Self, DomainError> {
        if token0.address == token1.address {
            return Err(DomainError::IdenticalTokens(token0.address));
        }
        Ok(Self {
            index,
            address,
            token0,
            token1,
        })
    }

    #[must_use]
    pub fn token0(&self) -> &Token {
        &self.token0
    }

    #[must_use]
    pub fn token1(&self) -> &Token {
        &self.token1
    }

    #[must_use]
    pub fn token(&self, side: Side) -> &Token {
        match side {
            Side::Token0 => &self.token0,
            Side::Token1 => &self.token1,
        }
    }

    /// Returns the side holding the token with the given address.
    #[must_use]
    pub fn side_of(&self, address: &Address) -> Option<Side> {
        if self.token0.address == *address {
            Some(Side::Token0)
        } else if self.token1.address == *address {
            Some(Side::Token1)
        } else {
            None
        }
    }

    /// Display name, `SYM0-SYM1`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}-{}", self.token0.symbol, self.token1.symbol)
    }

    /// Drops the linked tokens, keeping only their addresses.
    #[must_use]
    pub fn unresolved(&self) -> UnresolvedPair {
        UnresolvedPair {
            index: self.index,
            address: self.address,
            token0: self.token0.address,
            token1: self.token1.address,
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.token0.symbol, self.token1.symbol)
    }
}

/// Source of tokens for linking pairs.
pub trait TokenLookup {
    /// Returns the token with the given address, if known.
    fn token(&self, address: &Address) -> Option<Token>;
}

impl TokenLookup for HashMap<Address, Token> {
    fn token(&self, address: &Address) -> Option<Token> {
        self.get(address).cloned()
    }
}

impl TokenLookup for [Token] {
    fn token(&self, address: &Address) -> Option<Token> {
        self.iter().find(|t| t.address == *address).cloned()
    }
}

/// A pair whose tokens are known only by address, as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedPair {
    pub index: i64,
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
}

impl UnresolvedPair {
    /// Links both tokens through `lookup`.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownToken`] if a token is missing, or
    /// [`DomainError::IdenticalTokens`] if both addresses are equal.
    pub fn resolve<L: TokenLookup + ?Sized>(self, lookup: &L) -> Result<Pair, DomainError> {
        let token0 = lookup
            .token(&self.token0)
            .ok_or(DomainError::UnknownToken(self.token0))?;
        let token1 = lookup
            .token(&self.token1)
            .ok_or(DomainError::UnknownToken(self.token1))?;
        Pair::new(self.index, self.address, token0, token1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8, symbol: &str, decimals: u8) -> Token {
        Token::new(Address::from_bytes([byte; 20]), symbol, decimals, symbol)
    }

    #[test]
    fn test_pair_rejects_identical_tokens() {
        let go = token(1, "GO", 18);
        let result = Pair::new(0, Address::from_bytes([9; 20]), go.clone(), go);
        assert_eq!(
            result,
            Err(DomainError::IdenticalTokens(Address::from_bytes([1; 20])))
        );
    }

    #[test]
    fn test_pair_name_and_sides() {
        let pair = Pair::new(
            3,
            Address::from_bytes([9; 20]),
            token(1, "GO", 18),
            token(2, "USDC", 6),
        )
        .unwrap();
        assert_eq!(pair.name(), "GO-USDC");
        assert_eq!(pair.to_string(), "GO-USDC");
        assert_eq!(pair.side_of(&Address::from_bytes([2; 20])), Some(Side::Token1));
        assert_eq!(pair.side_of(&Address::from_bytes([7; 20])), None);
        assert_eq!(pair.token(Side::Token0).symbol, "GO");
        assert_eq!(Side::Token0.other(), Side::Token1);
    }

    #[test]
    fn test_deserialize_checks_tokens() {
        let pair = Pair::new(
            4,
            Address::from_bytes([9; 20]),
            token(1, "GO", 18),
            token(2, "USDC", 6),
        )
        .unwrap();
        let mut value = serde_json::to_value(&pair).unwrap();
        assert_eq!(serde_json::from_value::<Pair>(value.clone()).unwrap(), pair);

        value["token1"] = value["token0"].clone();
        let error = serde_json::from_value::<Pair>(value).unwrap_err();
        assert!(error.to_string().contains("must be distinct"), "{error}");
    }

    #[test]
    fn test_resolve_through_lookup() {
        let tokens = vec![token(1, "GO", 18), token(2, "USDC", 6)];
        let pair = Pair::new(
            1,
            Address::from_bytes([9; 20]),
            tokens[0].clone(),
            tokens[1].clone(),
        )
        .unwrap();

        let resolved = pair.unresolved().resolve(tokens.as_slice()).unwrap();
        assert_eq!(resolved, pair);

        let map: HashMap<Address, Token> = tokens.iter().map(|t| (t.address, t.clone())).collect();
        assert_eq!(pair.unresolved().resolve(&map).unwrap(), pair);
    }

    #[test]
    fn test_resolve_unknown_token() {
        let tokens = vec![token(1, "GO", 18)];
        let unresolved = UnresolvedPair {
            index: 0,
            address: Address::from_bytes([9; 20]),
            token0: Address::from_bytes([1; 20]),
            token1: Address::from_bytes([2; 20]),
        };
        assert_eq!(
            unresolved.resolve(tokens.as_slice()),
            Err(DomainError::UnknownToken(Address::from_bytes([2; 20])))
        );
    }
}
