//! Decimal-safe data model for AMM pair statistics.
//!
//! This crate holds everything that is pure computation:
//! - Lossless decimal text codec
//! - Tokens, pairs, liquidity samples and volume buckets
//! - Normalization of raw reserve integers
//! - Spot and USD anchor pricing, value and volume aggregation

/// Prelude module for convenient imports.
pub mod prelude;

/// Chain addresses.
pub mod address;
/// Lossless decimal text codec.
pub mod codec;
/// Valuation configuration.
pub mod config;
/// Persisted entities.
pub mod entities;
/// Entity construction errors.
pub mod error;
/// Raw reserve normalization.
pub mod reserves;
/// Price and value derivation.
pub mod valuation;

pub use address::Address;
pub use bigdecimal::BigDecimal;
pub use primitive_types::U256;
