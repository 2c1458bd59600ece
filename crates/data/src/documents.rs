//! Stored document shapes.
//!
//! Every decimal travels as a string and every address as `0x`-prefixed hex.
//! Field names are part of the stored schema: renaming one orphans every
//! document written before the rename.
//!
//! Decimal fields default to an empty string when absent, so a truncated
//! document hydrates as degraded instead of failing to deserialize.

use chrono::{DateTime, Utc};
use pairstats_domain::entities::RecordStatus;
use serde::{Deserialize, Serialize};

/// Stored form of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDocument {
    /// Token contract address.
    pub address: String,
    pub name: String,
    pub symbol: String,
    /// Decimal-scale exponent.
    pub decimals: u8,
    #[serde(rename = "totalSupply", default)]
    pub total_supply: String,
    /// External reference price in USD.
    #[serde(rename = "CMCPrice", default)]
    pub reference_price: String,
}

/// Stored form of a pair. Tokens are referenced by address only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDocument {
    /// Ordering index.
    pub index: i64,
    /// Pair contract address.
    pub address: String,
    #[serde(rename = "token0address")]
    pub token0_address: String,
    #[serde(rename = "token1address")]
    pub token1_address: String,
}

/// Stored form of a pair liquidity sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairLiquidityDocument {
    /// Pair contract address.
    pub address: String,
    pub time: DateTime<Utc>,
    /// Pair display name.
    pub pair: String,
    pub token0: String,
    pub token1: String,
    #[serde(rename = "totalSupply", default)]
    pub total_supply: String,
    #[serde(default)]
    pub reserve0: String,
    #[serde(default)]
    pub reserve1: String,
    #[serde(default)]
    pub price0: String,
    #[serde(default)]
    pub price1: String,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Stored form of a token liquidity sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLiquidityDocument {
    /// Token contract address.
    pub address: String,
    pub time: DateTime<Utc>,
    pub symbol: String,
    #[serde(default)]
    pub reserve: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Stored form of a pair volume bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairBucketDocument {
    /// Pair contract address.
    pub address: String,
    pub time: DateTime<Utc>,
    /// Pair display name.
    pub pair: String,
    #[serde(rename = "amount0In", default)]
    pub amount0_in: String,
    #[serde(rename = "amount1In", default)]
    pub amount1_in: String,
    #[serde(rename = "amount0Out", default)]
    pub amount0_out: String,
    #[serde(rename = "amount1Out", default)]
    pub amount1_out: String,
    #[serde(rename = "price0USD", default)]
    pub price0_usd: String,
    #[serde(rename = "price1USD", default)]
    pub price1_usd: String,
    #[serde(rename = "volumeUSD", default)]
    pub volume_usd: String,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Stored form of a token volume bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBucketDocument {
    /// Token contract address.
    pub address: String,
    pub time: DateTime<Utc>,
    pub symbol: String,
    #[serde(rename = "amountIn", default)]
    pub amount_in: String,
    #[serde(rename = "amountOut", default)]
    pub amount_out: String,
    #[serde(rename = "priceUSD", default)]
    pub price_usd: String,
    #[serde(rename = "volumeUSD", default)]
    pub volume_usd: String,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Stored form of a system-wide bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalBucketDocument {
    pub time: DateTime<Utc>,
    #[serde(rename = "volumeUSD", default)]
    pub volume_usd: String,
    #[serde(rename = "liquidityUSD", default)]
    pub liquidity_usd: String,
    #[serde(default)]
    pub status: RecordStatus,
}
