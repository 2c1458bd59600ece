//! Key-based document storage.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Errors reported by a document store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    /// The backend refused the operation.
    #[error("document store rejected {collection}/{key}: {reason}")]
    Rejected {
        collection: String,
        key: String,
        reason: String,
    },
}

/// A document store addressed by collection and key.
///
/// Only projected documents are ever written; the store never sees native
/// decimal values.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes a document, replacing any previous one under the same key.
    async fn put(&self, collection: &str, key: &str, document: Value) -> Result<(), StoreError>;

    /// Reads a document, or `None` if the key is absent.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn put(&self, collection: &str, key: &str, document: Value) -> Result<(), StoreError> {
        (**self).put(collection, key, document).await
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(collection, key).await
    }
}

/// In-process document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, HashMap<String, Value>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, collection: &str, key: &str, document: Value) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        debug!(collection, key, "Stored document");
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }
}
