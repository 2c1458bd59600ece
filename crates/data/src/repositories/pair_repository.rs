//! Pair repository.

use super::{DataError, TokenRepository, address_key, collections, load, save};
use crate::bridge::Hydrated;
use crate::documents::PairDocument;
use crate::store::DocumentStore;
use pairstats_domain::address::Address;
use pairstats_domain::entities::{Pair, UnresolvedPair};
use pairstats_domain::error::DomainError;
use std::sync::Arc;

/// Repository for pairs, keyed by address.
pub struct PairRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for PairRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> PairRepository<S> {
    /// Creates a new PairRepository.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Saves a pair. Its tokens are stored by address only.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save(&self, pair: &Pair) -> Result<(), DataError> {
        let key = address_key(&pair.address);
        save(self.store.as_ref(), collections::PAIRS, &key, pair).await
    }

    /// Finds a pair by its address, without its tokens.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_by_address(
        &self,
        address: &Address,
    ) -> Result<Option<Hydrated<UnresolvedPair>>, DataError> {
        let key = address_key(address);
        load::<_, PairDocument>(self.store.as_ref(), collections::PAIRS, &key).await
    }

    /// Finds a pair and links its tokens from `tokens`.
    ///
    /// Issues from the pair document and both token documents are merged.
    ///
    /// # Errors
    /// Returns [`DataError::Domain`] if a referenced token is not stored, or
    /// an error if a store read fails.
    pub async fn find_resolved(
        &self,
        address: &Address,
        tokens: &TokenRepository<S>,
    ) -> Result<Option<Hydrated<Pair>>, DataError> {
        let Some(Hydrated { record, mut issues }) = self.find_by_address(address).await? else {
            return Ok(None);
        };

        let mut linked = Vec::with_capacity(2);
        for token_address in [record.token0, record.token1] {
            let token = tokens
                .find_by_address(&token_address)
                .await?
                .ok_or(DomainError::UnknownToken(token_address))?;
            issues.extend(token.issues);
            linked.push(token.record);
        }

        let pair = record.resolve(linked.as_slice())?;
        Ok(Some(Hydrated { record: pair, issues }))
    }
}
