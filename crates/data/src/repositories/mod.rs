//! Repository implementations for document persistence.
//!
//! Each repository projects native entities right before writing them and
//! hydrates documents right after reading them, so callers only ever handle
//! native values.

mod bucket_repository;
mod liquidity_repository;
mod pair_repository;
mod token_repository;

pub use bucket_repository::BucketRepository;
pub use liquidity_repository::LiquidityRepository;
pub use pair_repository::PairRepository;
pub use token_repository::TokenRepository;

use crate::bridge::{Hydrate, Hydrated, Project};
use crate::store::{DocumentStore, StoreError};
use chrono::{DateTime, Utc};
use pairstats_domain::address::Address;
use pairstats_domain::error::DomainError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Collection names. Part of the stored schema.
pub mod collections {
    pub const TOKENS: &str = "tokens";
    pub const PAIRS: &str = "pairs";
    pub const PAIR_LIQUIDITY: &str = "pair_liquidity";
    pub const TOKEN_LIQUIDITY: &str = "token_liquidity";
    pub const PAIR_BUCKETS: &str = "pair_buckets";
    pub const TOKEN_BUCKETS: &str = "token_buckets";
    pub const TOTAL_BUCKETS: &str = "total_buckets";
}

/// Errors raised by repositories.
#[derive(Debug, Error)]
pub enum DataError {
    /// The store backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A stored value does not have the document shape.
    #[error("document shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),
    /// Linked entities could not be resolved.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Key of an entity identified by its address.
#[must_use]
pub fn address_key(address: &Address) -> String {
    address.to_hex()
}

/// Key of a sample or bucket, `address@unixtime`.
#[must_use]
pub fn sample_key(address: &Address, time: DateTime<Utc>) -> String {
    format!("{}@{}", address.to_hex(), time.timestamp())
}

/// Key of a system-wide bucket, `unixtime`.
#[must_use]
pub fn time_key(time: DateTime<Utc>) -> String {
    time.timestamp().to_string()
}

/// Entry point to every repository over one store.
pub struct Database<S> {
    store: Arc<S>,
}

impl<S> Clone for Database<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> Database<S> {
    /// Creates a new Database wrapper around a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a TokenRepository instance.
    #[must_use]
    pub fn tokens(&self) -> TokenRepository<S> {
        TokenRepository::new(self.store.clone())
    }

    /// Creates a PairRepository instance.
    #[must_use]
    pub fn pairs(&self) -> PairRepository<S> {
        PairRepository::new(self.store.clone())
    }

    /// Creates a LiquidityRepository instance.
    #[must_use]
    pub fn liquidity(&self) -> LiquidityRepository<S> {
        LiquidityRepository::new(self.store.clone())
    }

    /// Creates a BucketRepository instance.
    #[must_use]
    pub fn buckets(&self) -> BucketRepository<S> {
        BucketRepository::new(self.store.clone())
    }
}

/// Projects an entity and writes its document.
async fn save<S, E>(store: &S, collection: &str, key: &str, entity: &E) -> Result<(), DataError>
where
    S: DocumentStore + ?Sized,
    E: Project,
    E::Document: Serialize,
{
    let document = serde_json::to_value(entity.project())?;
    store.put(collection, key, document).await?;
    debug!(collection, key, "Saved record");
    Ok(())
}

/// Reads a document and hydrates it.
async fn load<S, D>(
    store: &S,
    collection: &str,
    key: &str,
) -> Result<Option<Hydrated<D::Record>>, DataError>
where
    S: DocumentStore + ?Sized,
    D: Hydrate + DeserializeOwned,
{
    let Some(value) = store.get(collection, key).await? else {
        return Ok(None);
    };
    let hydrated = serde_json::from_value::<D>(value)?.hydrate();
    if hydrated.is_degraded() {
        warn!(
            collection,
            key,
            fields = ?hydrated.fields(),
            "Loaded degraded record"
        );
    }
    Ok(Some(hydrated))
}
