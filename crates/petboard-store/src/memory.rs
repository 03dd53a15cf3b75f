use std::sync::RwLock;

use petboard_types::PetRecord;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory record store.
///
/// Intended for tests and embedding. A store built with [`failing`] refuses
/// every load, which exercises the degrade-to-empty path.
///
/// [`failing`]: InMemoryRecordStore::failing
pub struct InMemoryRecordStore {
    records: RwLock<Vec<PetRecord>>,
    fail_loads: bool,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store seeded with the given collection.
    pub fn with_records(records: Vec<PetRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            fail_loads: false,
        }
    }

    /// Create a store whose loads always fail.
    pub fn failing() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail_loads: true,
        }
    }

    /// Snapshot of the current collection, bypassing failure injection.
    pub fn snapshot(&self) -> Vec<PetRecord> {
        self.records.read().expect("lock poisoned").clone()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn load(&self) -> StoreResult<Vec<PetRecord>> {
        if self.fail_loads {
            return Err(StoreError::Parse {
                path: "<memory>".into(),
                reason: "load failure injected".into(),
            });
        }
        Ok(self.snapshot())
    }

    fn save(&self, records: &[PetRecord]) -> StoreResult<()> {
        *self.records.write().expect("lock poisoned") = records.to_vec();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len())
            .field("fail_loads", &self.fail_loads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petboard_types::PetDraft;

    #[test]
    fn save_replaces_collection() {
        let store = InMemoryRecordStore::new();
        assert!(store.is_empty());

        let pet = PetDraft::new("Rex", "Lab", "3").into_record("https://x/y.png");
        store.save(&[pet.clone(), pet.clone()]).unwrap();
        assert_eq!(store.len(), 2);

        store.save(&[pet]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn failing_store_degrades_to_empty() {
        let store = InMemoryRecordStore::failing();
        assert!(store.load().is_err());
        assert!(store.load_or_empty().is_empty());
    }
}
