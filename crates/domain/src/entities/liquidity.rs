//! Liquidity samples.

use crate::address::Address;
use crate::entities::RecordStatus;
use crate::entities::pair::{Pair, Side};
use crate::entities::token::Token;
use crate::reserves::Reserves;
use crate::valuation::{self, PairUsdPrices};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Snapshot of one pair's reserves and USD prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairLiquidity {
    /// Address of the pair.
    pub address: Address,
    pub time: DateTime<Utc>,
    /// Display name of the pair, `SYM0-SYM1`.
    pub pair: String,
    pub token0: Address,
    pub token1: Address,
    pub total_supply: BigDecimal,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    /// USD per unit of token0.
    pub price0: BigDecimal,
    /// USD per unit of token1.
    pub price1: BigDecimal,
    pub status: RecordStatus,
}

impl PairLiquidity {
    /// Creates an unpriced sample. Attach prices with [`Self::with_prices`].
    #[must_use]
    pub fn new(
        pair: &Pair,
        time: DateTime<Utc>,
        reserves: Reserves,
        total_supply: BigDecimal,
    ) -> Self {
        Self {
            address: pair.address,
            time,
            pair: pair.name(),
            token0: pair.token0().address,
            token1: pair.token1().address,
            total_supply,
            reserve0: reserves.reserve0,
            reserve1: reserves.reserve1,
            price0: BigDecimal::zero(),
            price1: BigDecimal::zero(),
            status: RecordStatus::Unpriced,
        }
    }

    #[must_use]
    pub fn with_prices(mut self, prices: &PairUsdPrices) -> Self {
        self.price0 = prices.price0.clone();
        self.price1 = prices.price1.clone();
        self.status = RecordStatus::Valid;
        self
    }

    /// Returns the side holding the token with the given address.
    #[must_use]
    pub fn side_of(&self, token: &Address) -> Option<Side> {
        if self.token0 == *token {
            Some(Side::Token0)
        } else if self.token1 == *token {
            Some(Side::Token1)
        } else {
            None
        }
    }

    #[must_use]
    pub fn reserve(&self, side: Side) -> &BigDecimal {
        match side {
            Side::Token0 => &self.reserve0,
            Side::Token1 => &self.reserve1,
        }
    }

    #[must_use]
    pub fn price(&self, side: Side) -> &BigDecimal {
        match side {
            Side::Token0 => &self.price0,
            Side::Token1 => &self.price1,
        }
    }

    /// Total USD value of the pool, `reserve0 * price0 + reserve1 * price1`.
    #[must_use]
    pub fn value_usd(&self) -> BigDecimal {
        valuation::pool_value(&self.reserve0, &self.price0, &self.reserve1, &self.price1)
    }
}

/// Snapshot of one token's liquidity across pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLiquidity {
    /// Address of the token.
    pub address: Address,
    pub time: DateTime<Utc>,
    pub symbol: String,
    pub reserve: BigDecimal,
    /// USD per unit.
    pub price: BigDecimal,
    pub status: RecordStatus,
}

impl TokenLiquidity {
    #[must_use]
    pub fn new(token: &Token, time: DateTime<Utc>, reserve: BigDecimal, price: BigDecimal) -> Self {
        Self {
            address: token.address,
            time,
            symbol: token.symbol.clone(),
            reserve,
            price,
            status: RecordStatus::Valid,
        }
    }

    /// Aggregates a token's reserves over the pair samples of one window.
    ///
    /// Samples not containing the token are ignored. The USD price comes
    /// from the first valid sample holding the token; without one the result
    /// is [`RecordStatus::Unpriced`]. A degraded input degrades the result.
    #[must_use]
    pub fn from_pair_samples(
        token: &Token,
        time: DateTime<Utc>,
        samples: &[PairLiquidity],
    ) -> Self {
        let mut reserve = BigDecimal::zero();
        let mut price = None;
        let mut degraded = false;

        for sample in samples {
            let Some(side) = sample.side_of(&token.address) else {
                continue;
            };
            reserve += sample.reserve(side);
            degraded |= sample.status == RecordStatus::Degraded;
            if price.is_none() && sample.status.is_valid() {
                price = Some(sample.price(side).clone());
            }
        }

        let status = match (&price, degraded) {
            (_, true) => RecordStatus::Degraded,
            (None, false) => RecordStatus::Unpriced,
            (Some(_), false) => RecordStatus::Valid,
        };
        Self {
            status,
            ..Self::new(token, time, reserve, price.unwrap_or_else(BigDecimal::zero))
        }
    }

    /// USD value of the token's reserve, `reserve * price`.
    #[must_use]
    pub fn value_usd(&self) -> BigDecimal {
        valuation::reserve_value(&self.reserve, &self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValuationConfig;
    use crate::valuation::usd_prices;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn token(byte: u8, symbol: &str) -> Token {
        Token::new(Address::from_bytes([byte; 20]), symbol, 18, symbol)
    }

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap()
    }

    fn a_b_sample() -> PairLiquidity {
        let pair = Pair::new(0, Address::from_bytes([9; 20]), token(1, "A"), token(2, "B"))
            .unwrap();
        PairLiquidity::new(&pair, time(), Reserves::new(dec("100"), dec("50")), dec("7"))
    }

    #[test]
    fn test_pair_value_usd() {
        let mut sample = a_b_sample();
        sample.price0 = dec("2.0");
        sample.price1 = dec("4.0");
        assert_eq!(sample.value_usd(), dec("400.0"));
    }

    #[test]
    fn test_unpriced_sample_has_zero_value() {
        let sample = a_b_sample();
        assert_eq!(sample.status, RecordStatus::Unpriced);
        assert_eq!(sample.pair, "A-B");
        assert!(sample.value_usd().is_zero());
    }

    #[test]
    fn test_with_prices_marks_valid() {
        let pair = Pair::new(0, Address::from_bytes([9; 20]), token(1, "GO"), token(2, "USDC"))
            .unwrap();
        let reserves = Reserves::new(dec("1000"), dec("2000"));
        let prices = usd_prices(&pair, &reserves, &ValuationConfig::default()).unwrap();
        let sample = PairLiquidity::new(&pair, time(), reserves, dec("1")).with_prices(&prices);
        assert_eq!(sample.status, RecordStatus::Valid);
        assert_eq!(sample.price0, dec("2"));
        assert_eq!(sample.value_usd(), dec("4000"));
    }

    #[test]
    fn test_token_liquidity_from_samples() {
        let go = token(1, "GO");
        let usdc = token(2, "USDC");
        let weth = token(3, "WETH");
        let config = ValuationConfig::default();

        let go_usdc = Pair::new(0, Address::from_bytes([9; 20]), go.clone(), usdc.clone()).unwrap();
        let reserves = Reserves::new(dec("100"), dec("50"));
        let prices = usd_prices(&go_usdc, &reserves, &config).unwrap();
        let priced = PairLiquidity::new(&go_usdc, time(), reserves, dec("1")).with_prices(&prices);

        let weth_go = Pair::new(1, Address::from_bytes([8; 20]), weth, go.clone()).unwrap();
        let weth_go_reserves = Reserves::new(dec("1"), dec("30"));
        let unpriced = PairLiquidity::new(&weth_go, time(), weth_go_reserves, dec("1"));

        let liquidity = TokenLiquidity::from_pair_samples(&go, time(), &[unpriced.clone(), priced]);
        assert_eq!(liquidity.reserve, dec("130"));
        assert_eq!(liquidity.price, dec("0.5"));
        assert_eq!(liquidity.status, RecordStatus::Valid);
        assert_eq!(liquidity.value_usd(), dec("65"));

        let liquidity = TokenLiquidity::from_pair_samples(&go, time(), &[unpriced]);
        assert_eq!(liquidity.status, RecordStatus::Unpriced);
        assert!(liquidity.price.is_zero());

        let liquidity = TokenLiquidity::from_pair_samples(&usdc, time(), &[]);
        assert!(liquidity.reserve.is_zero());
        assert_eq!(liquidity.symbol, "USDC");
    }
}
