//! Normalization of raw on-chain reserve integers.

use crate::entities::pair::{Pair, Side};
use crate::entities::token::Token;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Reserve integers exactly as the pair contract reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReserves {
    pub reserve0: U256,
    pub reserve1: U256,
}

impl RawReserves {
    pub fn new(reserve0: impl Into<U256>, reserve1: impl Into<U256>) -> Self {
        Self {
            reserve0: reserve0.into(),
            reserve1: reserve1.into(),
        }
    }
}

/// Reserves scaled by each token's decimal exponent. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
}

impl Reserves {
    #[must_use]
    pub fn new(reserve0: BigDecimal, reserve1: BigDecimal) -> Self {
        Self { reserve0, reserve1 }
    }

    #[must_use]
    pub fn get(&self, side: Side) -> &BigDecimal {
        match side {
            Side::Token0 => &self.reserve0,
            Side::Token1 => &self.reserve1,
        }
    }
}

/// Converts a raw integer amount into a decimal amount, `raw / 10^decimals`.
///
/// The result is built by setting the scale on the integer, so it is exact.
#[must_use]
pub fn normalize_amount(raw: U256, decimals: u8) -> BigDecimal {
    // U256 limbs are little-endian u64 words.
    let mut bytes = [0u8; 32];
    for (i, limb) in raw.0.iter().enumerate() {
        bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
    }
    let digits = BigInt::from_bytes_le(Sign::Plus, &bytes);
    BigDecimal::new(digits, i64::from(decimals))
}

/// Normalizes both reserves of a pair through its tokens' exponents.
#[must_use]
pub fn normalize_reserves(raw: &RawReserves, token0: &Token, token1: &Token) -> Reserves {
    Reserves {
        reserve0: normalize_amount(raw.reserve0, token0.decimals()),
        reserve1: normalize_amount(raw.reserve1, token1.decimals()),
    }
}

impl Pair {
    /// Normalizes raw reserves read from this pair's contract.
    #[must_use]
    pub fn normalize(&self, raw: &RawReserves) -> Reserves {
        normalize_reserves(raw, self.token0(), self.token1())
    }
}

impl Token {
    /// Converts a raw amount of this token into a decimal amount.
    #[must_use]
    pub fn amount(&self, raw: U256) -> BigDecimal {
        normalize_amount(raw, self.decimals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use num_traits::Zero;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize_six_decimals() {
        assert_eq!(normalize_amount(U256::from(1_500_000u64), 6), dec("1.5"));
    }

    #[test]
    fn test_normalize_zero_and_no_decimals() {
        assert!(normalize_amount(U256::zero(), 18).is_zero());
        assert_eq!(normalize_amount(U256::from(42u64), 0), dec("42"));
    }

    #[test]
    fn test_normalize_keeps_every_digit() {
        assert_eq!(
            normalize_amount(U256::from(1u64), 18),
            dec("0.000000000000000001")
        );
        assert_eq!(
            normalize_amount(U256::MAX, 18),
            dec("115792089237316195423570985008687907853269984665640564039457.584007913129639935")
        );
    }

    #[test]
    fn test_normalize_pair_reserves() {
        let go = Token::new(Address::from_bytes([1; 20]), "GO", 18, "GoChain");
        let usdc = Token::new(Address::from_bytes([2; 20]), "USDC", 6, "USD Coin");
        let pair = Pair::new(0, Address::from_bytes([3; 20]), go, usdc).unwrap();

        let raw = RawReserves::new(
            U256::from(2_500_000_000_000_000_000u128),
            U256::from(10_000_000u64),
        );
        let reserves = pair.normalize(&raw);
        assert_eq!(reserves.reserve0, dec("2.5"));
        assert_eq!(reserves.reserve1, dec("10"));
        assert_eq!(reserves.get(Side::Token1), &dec("10"));
    }
}
