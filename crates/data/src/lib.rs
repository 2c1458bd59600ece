//! Persistence of pair statistics in a document store.
//!
//! This crate provides:
//! - Stored document shapes with fixed field names
//! - The persistence bridge projecting and hydrating entities
//! - A key-based document store abstraction and an in-memory store
//! - Repositories for tokens, pairs, liquidity samples and volume buckets

/// Persistence bridge.
pub mod bridge;
/// Stored document shapes.
pub mod documents;
/// Repositories over a document store.
pub mod repositories;
/// Document store abstraction.
pub mod store;

pub use bridge::{FieldIssue, Hydrate, Hydrated, Project};
pub use repositories::{
    BucketRepository, DataError, Database, LiquidityRepository, PairRepository, TokenRepository,
};
pub use store::{DocumentStore, MemoryStore, StoreError};
