//! Volume bucket repository.

use super::{DataError, collections, load, sample_key, save, time_key};
use crate::bridge::Hydrated;
use crate::documents::{PairBucketDocument, TokenBucketDocument, TotalBucketDocument};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use pairstats_domain::address::Address;
use pairstats_domain::entities::{PairBucket, TokenBucket, TotalBucket};
use std::sync::Arc;

/// Repository for pair, token and total volume buckets.
pub struct BucketRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for BucketRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> BucketRepository<S> {
    /// Creates a new BucketRepository.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Saves a pair bucket.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save_pair(&self, bucket: &PairBucket) -> Result<(), DataError> {
        let key = sample_key(&bucket.address, bucket.time);
        save(self.store.as_ref(), collections::PAIR_BUCKETS, &key, bucket).await
    }

    /// Finds the bucket of a pair starting at `time`.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_pair(
        &self,
        pair: &Address,
        time: DateTime<Utc>,
    ) -> Result<Option<Hydrated<PairBucket>>, DataError> {
        let key = sample_key(pair, time);
        load::<_, PairBucketDocument>(self.store.as_ref(), collections::PAIR_BUCKETS, &key).await
    }

    /// Saves a token bucket.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save_token(&self, bucket: &TokenBucket) -> Result<(), DataError> {
        let key = sample_key(&bucket.address, bucket.time);
        save(self.store.as_ref(), collections::TOKEN_BUCKETS, &key, bucket).await
    }

    /// Finds the bucket of a token starting at `time`.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_token(
        &self,
        token: &Address,
        time: DateTime<Utc>,
    ) -> Result<Option<Hydrated<TokenBucket>>, DataError> {
        let key = sample_key(token, time);
        load::<_, TokenBucketDocument>(self.store.as_ref(), collections::TOKEN_BUCKETS, &key).await
    }

    /// Saves a system-wide bucket.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn save_total(&self, bucket: &TotalBucket) -> Result<(), DataError> {
        let key = time_key(bucket.time);
        save(self.store.as_ref(), collections::TOTAL_BUCKETS, &key, bucket).await
    }

    /// Finds the system-wide bucket starting at `time`.
    ///
    /// # Errors
    /// Returns an error if the store read fails or the document is malformed.
    pub async fn find_total(
        &self,
        time: DateTime<Utc>,
    ) -> Result<Option<Hydrated<TotalBucket>>, DataError> {
        let key = time_key(time);
        load::<_, TotalBucketDocument>(self.store.as_ref(), collections::TOTAL_BUCKETS, &key).await
    }
}
