//! Token repository.

use super::{DataError, address_key, collections, load, save};
use crate::bridge::Hydrated;
use crate::documents::TokenDocument;
use crate::store::DocumentStore;
use pairstats_domain::address::Address;
use pairstats_domain::entities::Token;
use std::sync::Arc;

/// Repository for tokens, keyed by address.
pub struct TokenRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for TokenRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> TokenRepository<S> {
    /// Creates a new TokenRepository.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Saves a token.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save(&self, token: &Token) -> Result<(), DataError> {
        let key = address_key(&token.address);
        save(self.store.as_ref(), collections::TOKENS, &key, token).await
    }

    /// Finds a token by its address.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_by_address(
        &self,
        address: &Address,
    ) -> Result<Option<Hydrated<Token>>, DataError> {
        let key = address_key(address);
        load::<_, TokenDocument>(self.store.as_ref(), collections::TOKENS, &key).await
    }
}
