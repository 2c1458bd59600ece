use crate::address::Address;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ERC20-style token.
///
/// The decimal-scale exponent is fixed when the token is created: every raw
/// on-chain amount of this token is divided by `10^decimals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    decimals: u8,
    pub total_supply: BigDecimal,
    /// USD price from an external market-data reference. Stored, never fetched.
    pub reference_price: BigDecimal,
}

impl Token {
    pub fn new(
        address: Address,
        symbol: impl Into<String>,
        decimals: u8,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: BigDecimal::zero(),
            reference_price: BigDecimal::zero(),
        }
    }

    /// Decimal-scale exponent of the token.
    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn with_total_supply(mut self, total_supply: BigDecimal) -> Self {
        self.total_supply = total_supply;
        self
    }

    /// Sets the reference price from a market-data quote. The conversion is exact.
    #[must_use]
    pub fn with_reference_price(mut self, price: rust_decimal::Decimal) -> Self {
        self.reference_price =
            BigDecimal::new(BigInt::from(price.mantissa()), i64::from(price.scale()));
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}
