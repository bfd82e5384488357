use async_trait::async_trait;
use burrow_core::store::Result;
use burrow_core::{Atomicity, Link, LinkRecord, ReadStore, ShortCode, StorageError, Store};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

/// In-memory implementation of the store contract using DashMap.
///
/// DashMap shards its locks, so concurrent reads and writes to different
/// buckets don't block each other. `create` goes through the entry API and is
/// therefore an atomic create-if-absent.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    storage: DashMap<String, LinkRecord>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Stores a raw record, bypassing the create contract.
    ///
    /// Used to seed fixtures, including deliberately incomplete records.
    pub fn put_record(&self, code: &ShortCode, record: LinkRecord) {
        self.storage.insert(code.as_str().to_owned(), record);
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadStore for InMemoryStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        trace!(code = %code, "in-memory get");
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create(&self, code: &ShortCode, link: Link) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(link.into());
                trace!(code = %code, "in-memory create");
                Ok(())
            }
        }
    }

    fn atomicity(&self) -> Atomicity {
        Atomicity::CreateIfAbsent
    }
}
