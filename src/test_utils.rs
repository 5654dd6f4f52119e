//! Test doubles for the storage seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use did_core::{Identifier, Repository, Result};

/// In-memory [`Repository`] for tests and examples. Records are kept in
/// insertion order; lookups return the most recently inserted match.
#[derive(Default)]
pub struct MemoryRepository {
    records: Mutex<Vec<Identifier>>,
    inserts: AtomicUsize,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many inserts the repository has accepted.
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

impl Repository for MemoryRepository {
    async fn query_by_name(&self, name: &str) -> Result<Option<Identifier>> {
        let records = self.records.lock().expect("lock on repository records failed");
        Ok(records.iter().rev().find(|r| r.name == name).cloned())
    }

    async fn query_by_id(&self, did: &str) -> Result<Option<Identifier>> {
        let records = self.records.lock().expect("lock on repository records failed");
        Ok(records.iter().rev().find(|r| r.did == did).cloned())
    }

    async fn insert(&self, identifier: &Identifier) -> Result<()> {
        let mut records = self.records.lock().expect("lock on repository records failed");
        records.push(identifier.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
