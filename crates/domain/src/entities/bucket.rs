//! Volume buckets and sampling windows.
//!
//! A bucket's `volume_usd` is always derived from its flows and prices. It is
//! stored alongside them, so [`PairBucket::validate`] and
//! [`TokenBucket::validate`] detect a record whose flows were changed without
//! recomputing the volume.

use crate::address::Address;
use crate::entities::RecordStatus;
use crate::entities::liquidity::PairLiquidity;
use crate::entities::pair::{Pair, Side};
use crate::entities::token::Token;
use crate::valuation::{self, PairUsdPrices};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by bucket validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    /// The stored USD volume does not match the priced flows.
    #[error("stored volume {stored} USD does not match priced flows {expected} USD")]
    InconsistentVolume {
        stored: BigDecimal,
        expected: BigDecimal,
    },
}

/// Length of a sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketWindow {
    Hour,
    Day,
}

impl BucketWindow {
    #[must_use]
    pub fn seconds(self) -> i64 {
        match self {
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }

    /// Start of the window containing `time`.
    #[must_use]
    pub fn floor(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let secs = time.timestamp();
        let start = secs - secs.rem_euclid(self.seconds());
        DateTime::from_timestamp(start, 0).unwrap_or(time)
    }

    /// Returns true if `time` falls in the window starting at `start`.
    #[must_use]
    pub fn contains(self, start: DateTime<Utc>, time: DateTime<Utc>) -> bool {
        self.floor(time) == start
    }
}

/// Raw trade flows through a pair during one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFlows {
    pub amount0_in: BigDecimal,
    pub amount1_in: BigDecimal,
    pub amount0_out: BigDecimal,
    pub amount1_out: BigDecimal,
}

impl PairFlows {
    /// Total in and out flow of one side.
    #[must_use]
    pub fn side_total(&self, side: Side) -> (BigDecimal, BigDecimal) {
        match side {
            Side::Token0 => (self.amount0_in.clone(), self.amount0_out.clone()),
            Side::Token1 => (self.amount1_in.clone(), self.amount1_out.clone()),
        }
    }
}

/// Trade volume through one pair during one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairBucket {
    /// Address of the pair.
    pub address: Address,
    pub time: DateTime<Utc>,
    /// Display name of the pair, `SYM0-SYM1`.
    pub pair: String,
    pub amount0_in: BigDecimal,
    pub amount1_in: BigDecimal,
    pub amount0_out: BigDecimal,
    pub amount1_out: BigDecimal,
    pub price0_usd: BigDecimal,
    pub price1_usd: BigDecimal,
    pub volume_usd: BigDecimal,
    pub status: RecordStatus,
}

impl PairBucket {
    /// Creates a priced bucket and derives its USD volume.
    #[must_use]
    pub fn new(pair: &Pair, time: DateTime<Utc>, flows: PairFlows, prices: &PairUsdPrices) -> Self {
        let mut bucket = Self::unpriced(pair, time, flows);
        bucket.price0_usd = prices.price0.clone();
        bucket.price1_usd = prices.price1.clone();
        bucket.status = RecordStatus::Valid;
        bucket.recompute();
        bucket
    }

    /// Creates a bucket whose USD prices are unknown. Its volume is zero.
    #[must_use]
    pub fn unpriced(pair: &Pair, time: DateTime<Utc>, flows: PairFlows) -> Self {
        Self {
            address: pair.address,
            time,
            pair: pair.name(),
            amount0_in: flows.amount0_in,
            amount1_in: flows.amount1_in,
            amount0_out: flows.amount0_out,
            amount1_out: flows.amount1_out,
            price0_usd: BigDecimal::zero(),
            price1_usd: BigDecimal::zero(),
            volume_usd: BigDecimal::zero(),
            status: RecordStatus::Unpriced,
        }
    }

    #[must_use]
    pub fn flows(&self) -> PairFlows {
        PairFlows {
            amount0_in: self.amount0_in.clone(),
            amount1_in: self.amount1_in.clone(),
            amount0_out: self.amount0_out.clone(),
            amount1_out: self.amount1_out.clone(),
        }
    }

    #[must_use]
    pub fn price_usd(&self, side: Side) -> &BigDecimal {
        match side {
            Side::Token0 => &self.price0_usd,
            Side::Token1 => &self.price1_usd,
        }
    }

    /// Sum of every in and out flow priced in USD.
    #[must_use]
    pub fn expected_volume_usd(&self) -> BigDecimal {
        let flow0 = &self.amount0_in + &self.amount0_out;
        let flow1 = &self.amount1_in + &self.amount1_out;
        valuation::pool_value(&flow0, &self.price0_usd, &flow1, &self.price1_usd)
    }

    /// Re-derives `volume_usd` from the current flows and prices.
    pub fn recompute(&mut self) {
        self.volume_usd = self.expected_volume_usd();
    }

    /// Checks that `volume_usd` matches the flows.
    ///
    /// # Errors
    /// Returns [`BucketError::InconsistentVolume`] on mismatch.
    pub fn validate(&self) -> Result<(), BucketError> {
        check_volume(&self.volume_usd, self.expected_volume_usd())
    }
}

/// Trade volume of one token across pairs during one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBucket {
    /// Address of the token.
    pub address: Address,
    pub time: DateTime<Utc>,
    pub symbol: String,
    pub amount_in: BigDecimal,
    pub amount_out: BigDecimal,
    pub price_usd: BigDecimal,
    pub volume_usd: BigDecimal,
    pub status: RecordStatus,
}

impl TokenBucket {
    /// Creates a priced bucket and derives its USD volume.
    #[must_use]
    pub fn new(
        token: &Token,
        time: DateTime<Utc>,
        amount_in: BigDecimal,
        amount_out: BigDecimal,
        price_usd: BigDecimal,
    ) -> Self {
        let mut bucket = Self {
            address: token.address,
            time,
            symbol: token.symbol.clone(),
            amount_in,
            amount_out,
            price_usd,
            volume_usd: BigDecimal::zero(),
            status: RecordStatus::Valid,
        };
        bucket.recompute();
        bucket
    }

    /// Sums one token's flows over the pair buckets of a window.
    ///
    /// Entries whose pair does not hold the token, or whose bucket belongs to
    /// another pair, are skipped. The USD price comes from the first valid
    /// bucket; without one the result is [`RecordStatus::Unpriced`].
    #[must_use]
    pub fn from_pair_buckets<'a, I>(token: &Token, time: DateTime<Utc>, buckets: I) -> Self
    where
        I: IntoIterator<Item = (&'a Pair, &'a PairBucket)>,
    {
        let mut amount_in = BigDecimal::zero();
        let mut amount_out = BigDecimal::zero();
        let mut price = None;
        let mut degraded = false;

        for (pair, bucket) in buckets {
            if pair.address != bucket.address {
                continue;
            }
            let Some(side) = pair.side_of(&token.address) else {
                continue;
            };
            let (side_in, side_out) = bucket.flows().side_total(side);
            amount_in += side_in;
            amount_out += side_out;
            degraded |= bucket.status == RecordStatus::Degraded;
            if price.is_none() && bucket.status.is_valid() {
                price = Some(bucket.price_usd(side).clone());
            }
        }

        let status = match (&price, degraded) {
            (_, true) => RecordStatus::Degraded,
            (None, false) => RecordStatus::Unpriced,
            (Some(_), false) => RecordStatus::Valid,
        };
        Self {
            status,
            ..Self::new(token, time, amount_in, amount_out, price.unwrap_or_else(BigDecimal::zero))
        }
    }

    /// `(amount_in + amount_out) * price_usd`.
    #[must_use]
    pub fn expected_volume_usd(&self) -> BigDecimal {
        let flow = &self.amount_in + &self.amount_out;
        valuation::reserve_value(&flow, &self.price_usd)
    }

    pub fn recompute(&mut self) {
        self.volume_usd = self.expected_volume_usd();
    }

    /// Checks that `volume_usd` matches the flows.
    ///
    /// # Errors
    /// Returns [`BucketError::InconsistentVolume`] on mismatch.
    pub fn validate(&self) -> Result<(), BucketError> {
        check_volume(&self.volume_usd, self.expected_volume_usd())
    }
}

/// System-wide volume and liquidity during one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalBucket {
    pub time: DateTime<Utc>,
    pub volume_usd: BigDecimal,
    pub liquidity_usd: BigDecimal,
    pub status: RecordStatus,
}

impl TotalBucket {
    /// Sums pair bucket volumes and pair sample values of one window.
    ///
    /// Any input that is not valid makes the total [`RecordStatus::Degraded`],
    /// since part of the system is missing from it.
    #[must_use]
    pub fn aggregate(
        time: DateTime<Utc>,
        buckets: &[PairBucket],
        samples: &[PairLiquidity],
    ) -> Self {
        let volume_usd = valuation::sum(buckets.iter().map(|b| &b.volume_usd));
        let liquidity_usd = samples
            .iter()
            .fold(BigDecimal::zero(), |acc, s| acc + s.value_usd());
        let complete = buckets.iter().all(|b| b.status.is_valid())
            && samples.iter().all(|s| s.status.is_valid());

        Self {
            time,
            volume_usd,
            liquidity_usd,
            status: if complete {
                RecordStatus::Valid
            } else {
                RecordStatus::Degraded
            },
        }
    }
}

fn check_volume(stored: &BigDecimal, expected: BigDecimal) -> Result<(), BucketError> {
    if *stored == expected {
        Ok(())
    } else {
        Err(BucketError::InconsistentVolume {
            stored: stored.clone(),
            expected,
        })
    }
}
