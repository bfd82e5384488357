use crate::error::StorageError;
use crate::link::{Link, LinkRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// How a store's [`Store::create`] behaves when the key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atomicity {
    /// `create` fails with [`StorageError::Conflict`] if the key exists.
    CreateIfAbsent,
    /// `create` may silently overwrite an existing key. Callers that need
    /// uniqueness must check before and verify after the write.
    CheckThenAct,
}

/// A read-only view of a link store.
///
/// The redirector only ever needs this half of the contract.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the record stored under `code`.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Checks whether a short code already exists in the store.
    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.get(code).await?.is_some())
    }
}

#[async_trait]
pub trait Store: ReadStore {
    /// Persists a new link under `code`.
    ///
    /// Stores with [`Atomicity::CreateIfAbsent`] return
    /// `Err(StorageError::Conflict)` when the code is taken.
    async fn create(&self, code: &ShortCode, link: Link) -> Result<()>;

    /// Reports whether `create` is an atomic create-if-absent.
    fn atomicity(&self) -> Atomicity;
}

#[async_trait]
impl<T: ReadStore + ?Sized> ReadStore for Arc<T> {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        (**self).get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    async fn create(&self, code: &ShortCode, link: Link) -> Result<()> {
        (**self).create(code, link).await
    }

    fn atomicity(&self) -> Atomicity {
        (**self).atomicity()
    }
}
