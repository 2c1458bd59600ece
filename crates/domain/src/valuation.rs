//! Price and value derivation.
//!
//! Every function here is a pure computation over [`BigDecimal`] inputs.
//! Floating point is never used, so repeated aggregation across buckets does
//! not accumulate rounding error.

use crate::config::ValuationConfig;
use crate::entities::pair::{Pair, Side};
use crate::reserves::Reserves;
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions under which a price cannot be derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// A reserve is zero, so any ratio over it is undefined.
    #[error("pair has no liquidity")]
    NoLiquidity,
    /// Neither token of the pair is a USD anchor.
    #[error("cannot price {pair} in USD: no anchor token")]
    NoAnchor {
        /// Display name of the pair.
        pair: String,
    },
}

/// Spot price ratios between the two tokens of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPrices {
    /// Price of one token1 expressed in token0, `r0 / r1`.
    pub token1_in_token0: BigDecimal,
    /// Price of one token0 expressed in token1, `r1 / r0`.
    pub token0_in_token1: BigDecimal,
}

/// USD prices for both tokens of an anchored pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairUsdPrices {
    pub price0: BigDecimal,
    pub price1: BigDecimal,
    /// The side priced at exactly 1 USD.
    pub anchor: Side,
}

impl PairUsdPrices {
    #[must_use]
    pub fn get(&self, side: Side) -> &BigDecimal {
        match side {
            Side::Token0 => &self.price0,
            Side::Token1 => &self.price1,
        }
    }

    /// USD price of the non-anchor token.
    #[must_use]
    pub fn quoted(&self) -> &BigDecimal {
        self.get(self.anchor.other())
    }
}

/// Derives the spot price ratios from normalized reserves.
///
/// # Errors
/// Returns [`ValuationError::NoLiquidity`] if either reserve is zero.
pub fn spot_prices(reserves: &Reserves) -> Result<SpotPrices, ValuationError> {
    if reserves.reserve0.is_zero() || reserves.reserve1.is_zero() {
        return Err(ValuationError::NoLiquidity);
    }
    Ok(SpotPrices {
        token1_in_token0: &reserves.reserve0 / &reserves.reserve1,
        token0_in_token1: &reserves.reserve1 / &reserves.reserve0,
    })
}

/// Returns the anchor side of a pair. When both tokens are anchors, token0 wins.
///
/// # Errors
/// Returns [`ValuationError::NoAnchor`] if neither token is an anchor.
pub fn anchor_side(pair: &Pair, config: &ValuationConfig) -> Result<Side, ValuationError> {
    if config.is_anchor(pair.token0()) {
        Ok(Side::Token0)
    } else if config.is_anchor(pair.token1()) {
        Ok(Side::Token1)
    } else {
        Err(ValuationError::NoAnchor { pair: pair.name() })
    }
}

/// Prices both tokens of a pair in USD through its anchor token.
///
/// The anchor is worth 1 USD and the other token is worth
/// `anchorReserve / otherReserve`.
///
/// # Errors
/// Returns [`ValuationError::NoAnchor`] for an unanchored pair and
/// [`ValuationError::NoLiquidity`] if either reserve is zero.
pub fn usd_prices(
    pair: &Pair,
    reserves: &Reserves,
    config: &ValuationConfig,
) -> Result<PairUsdPrices, ValuationError> {
    let anchor = anchor_side(pair, config)?;
    let anchor_reserve = reserves.get(anchor);
    let other_reserve = reserves.get(anchor.other());
    if anchor_reserve.is_zero() || other_reserve.is_zero() {
        return Err(ValuationError::NoLiquidity);
    }

    let quoted = anchor_reserve / other_reserve;
    let (price0, price1) = match anchor {
        Side::Token0 => (BigDecimal::one(), quoted),
        Side::Token1 => (quoted, BigDecimal::one()),
    };
    Ok(PairUsdPrices {
        price0,
        price1,
        anchor,
    })
}

/// USD value of two priced reserves, `r0 * p0 + r1 * p1`.
#[must_use]
pub fn pool_value(
    reserve0: &BigDecimal,
    price0: &BigDecimal,
    reserve1: &BigDecimal,
    price1: &BigDecimal,
) -> BigDecimal {
    reserve0 * price0 + reserve1 * price1
}

/// USD value of a single priced reserve.
#[must_use]
pub fn reserve_value(reserve: &BigDecimal, price: &BigDecimal) -> BigDecimal {
    reserve * price
}

/// Sums an iterator of decimals.
pub fn sum<'a, I>(values: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    values
        .into_iter()
        .fold(BigDecimal::zero(), |acc, value| acc + value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::entities::token::Token;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn pair(symbol0: &str, symbol1: &str) -> Pair {
        Pair::new(
            0,
            Address::from_bytes([9; 20]),
            Token::new(Address::from_bytes([1; 20]), symbol0, 6, symbol0),
            Token::new(Address::from_bytes([2; 20]), symbol1, 18, symbol1),
        )
        .unwrap()
    }

    #[test]
    fn test_spot_prices() {
        let prices = spot_prices(&Reserves::new(dec("1000"), dec("500"))).unwrap();
        assert_eq!(prices.token1_in_token0, dec("2.0"));
        assert_eq!(prices.token0_in_token1, dec("0.5"));
    }

    #[test]
    fn test_spot_prices_no_liquidity() {
        assert_eq!(
            spot_prices(&Reserves::new(dec("0"), dec("500"))),
            Err(ValuationError::NoLiquidity)
        );
        assert_eq!(
            spot_prices(&Reserves::new(dec("10"), dec("0"))),
            Err(ValuationError::NoLiquidity)
        );
    }

    #[test]
    fn test_usd_price_anchor_on_token0() {
        let pair = pair("USDC", "GO");
        let config = ValuationConfig::default();
        let prices = usd_prices(&pair, &Reserves::new(dec("2000"), dec("1000")), &config).unwrap();
        assert_eq!(prices.anchor, Side::Token0);
        assert_eq!(prices.price0, dec("1"));
        assert_eq!(prices.price1, dec("2.0"));
        assert_eq!(prices.quoted(), &dec("2"));
    }

    #[test]
    fn test_usd_price_anchor_on_token1() {
        let pair = pair("GO", "USDC");
        let config = ValuationConfig::default();
        let prices = usd_prices(&pair, &Reserves::new(dec("1000"), dec("2000")), &config).unwrap();
        assert_eq!(prices.anchor, Side::Token1);
        assert_eq!(prices.price0, dec("2.0"));
        assert_eq!(prices.price1, dec("1"));
    }

    #[test]
    fn test_usd_price_without_anchor() {
        let pair = pair("GO", "WETH");
        let config = ValuationConfig::default();
        let result = usd_prices(&pair, &Reserves::new(dec("1"), dec("1")), &config);
        assert_eq!(
            result,
            Err(ValuationError::NoAnchor {
                pair: "GO-WETH".to_string()
            })
        );
    }

    #[test]
    fn test_usd_price_both_anchors_prefers_token0() {
        let pair = pair("USDC", "USDT");
        let config = ValuationConfig::default().with_anchor("USDT");
        let prices = usd_prices(&pair, &Reserves::new(dec("1010"), dec("1000")), &config).unwrap();
        assert_eq!(prices.anchor, Side::Token0);
        assert_eq!(prices.price1, dec("1.01"));
    }

    #[test]
    fn test_usd_price_zero_reserve() {
        let pair = pair("USDC", "GO");
        let config = ValuationConfig::default();
        let result = usd_prices(&pair, &Reserves::new(dec("2000"), dec("0")), &config);
        assert_eq!(result, Err(ValuationError::NoLiquidity));
    }

    #[test]
    fn test_pool_value() {
        let value = pool_value(&dec("100"), &dec("2.0"), &dec("50"), &dec("4.0"));
        assert_eq!(value, dec("400.0"));
        assert_eq!(reserve_value(&dec("3"), &dec("1.5")), dec("4.5"));
    }

    #[test]
    fn test_sum() {
        let values = vec![dec("0.1"), dec("0.2"), dec("0.3")];
        assert_eq!(sum(&values), dec("0.6"));
        assert!(sum(std::iter::empty()).is_zero());
    }
}
