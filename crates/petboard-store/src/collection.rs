use petboard_types::{Partition, PetEdit, PetRecord, PetRef};

use crate::error::{StoreError, StoreResult};

/// A loaded collection and the mutations the handlers apply to it.
///
/// Position in the collection is the index half of [`PetRef`]. Removing a
/// record shifts every later index down by one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PetCollection {
    records: Vec<PetRecord>,
}

impl PetCollection {
    pub fn new(records: Vec<PetRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PetRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PetRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the record addressed by `pet`.
    ///
    /// An id is looked up first; an index is used only when it is in range
    /// and no record carries the id.
    pub fn resolve(&self, pet: PetRef) -> StoreResult<usize> {
        let by_id = pet
            .id()
            .and_then(|id| self.records.iter().position(|r| r.id == id));
        let by_index = || pet.index().filter(|&i| i < self.records.len());
        by_id.or_else(by_index).ok_or(StoreError::NotFound(pet))
    }

    pub fn get(&self, pet: PetRef) -> StoreResult<&PetRecord> {
        let idx = self.resolve(pet)?;
        Ok(&self.records[idx])
    }

    /// Append a record and return its index.
    pub fn append(&mut self, record: PetRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Set the adopted flag. Adopting an adopted pet is a no-op success.
    pub fn adopt(&mut self, pet: PetRef) -> StoreResult<&PetRecord> {
        let idx = self.resolve(pet)?;
        self.records[idx].mark_adopted();
        Ok(&self.records[idx])
    }

    /// Remove a record and return it.
    pub fn remove(&mut self, pet: PetRef) -> StoreResult<PetRecord> {
        let idx = self.resolve(pet)?;
        Ok(self.records.remove(idx))
    }

    /// Overwrite name, breed and age; `image_url` and `adopted` are kept.
    pub fn edit(&mut self, pet: PetRef, edit: &PetEdit) -> StoreResult<&PetRecord> {
        let idx = self.resolve(pet)?;
        self.records[idx].apply_edit(edit);
        Ok(&self.records[idx])
    }

    pub fn partition(&self) -> Partition {
        Partition::from_records(&self.records)
    }
}

impl From<Vec<PetRecord>> for PetCollection {
    fn from(records: Vec<PetRecord>) -> Self {
        Self::new(records)
    }
}
