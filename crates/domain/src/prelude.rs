//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use pairstats_domain::prelude::*;
//! ```

pub use crate::address::{Address, AddressError};
pub use crate::codec::{CodecError, Decoded};
pub use crate::config::ValuationConfig;
pub use crate::entities::{
    BucketError, BucketWindow, Pair, PairBucket, PairFlows, PairLiquidity, RecordStatus, Side,
    Token, TokenBucket, TokenLiquidity, TokenLookup, TotalBucket, UnresolvedPair,
};
pub use crate::error::DomainError;
pub use crate::reserves::{RawReserves, Reserves, normalize_amount, normalize_reserves};
pub use crate::valuation::{
    PairUsdPrices, SpotPrices, ValuationError, anchor_side, spot_prices, usd_prices,
};
pub use bigdecimal::BigDecimal;
pub use primitive_types::U256;
