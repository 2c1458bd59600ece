//! Liquidity sample repository.

use super::{DataError, collections, load, sample_key, save};
use crate::bridge::Hydrated;
use crate::documents::{PairLiquidityDocument, TokenLiquidityDocument};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use pairstats_domain::address::Address;
use pairstats_domain::entities::{PairLiquidity, TokenLiquidity};
use std::sync::Arc;

/// Repository for pair and token liquidity samples, keyed by address and time.
pub struct LiquidityRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for LiquidityRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> LiquidityRepository<S> {
    /// Creates a new LiquidityRepository.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Saves a pair sample.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save_pair(&self, sample: &PairLiquidity) -> Result<(), DataError> {
        let key = sample_key(&sample.address, sample.time);
        save(self.store.as_ref(), collections::PAIR_LIQUIDITY, &key, sample).await
    }

    /// Finds the sample of a pair at a given time.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_pair(
        &self,
        pair: &Address,
        time: DateTime<Utc>,
    ) -> Result<Option<Hydrated<PairLiquidity>>, DataError> {
        let key = sample_key(pair, time);
        load::<_, PairLiquidityDocument>(self.store.as_ref(), collections::PAIR_LIQUIDITY, &key)
            .await
    }

    /// Saves a token sample.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save_token(&self, sample: &TokenLiquidity) -> Result<(), DataError> {
        let key = sample_key(&sample.address, sample.time);
        save(self.store.as_ref(), collections::TOKEN_LIQUIDITY, &key, sample).await
    }

    /// Finds the sample of a token at a given time.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_token(
        &self,
        token: &Address,
        time: DateTime<Utc>,
    ) -> Result<Option<Hydrated<TokenLiquidity>>, DataError> {
        let key = sample_key(token, time);
        load::<_, TokenLiquidityDocument>(self.store.as_ref(), collections::TOKEN_LIQUIDITY, &key)
            .await
    }
}
