//! Listing view model.
//!
//! The listing page shows two groups. Each entry keeps its position in the
//! full collection so forms can address it.

use serde::Serialize;

use crate::pet::PetRecord;

/// A record paired with its position in the full collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexedPet {
    pub index: usize,
    pub pet: PetRecord,
}

/// The collection split by adoption status, each group in collection order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub available: Vec<IndexedPet>,
    pub adopted: Vec<IndexedPet>,
}

impl Partition {
    pub fn from_records(records: &[PetRecord]) -> Self {
        let mut partition = Self::default();
        for (index, pet) in records.iter().enumerate() {
            let entry = IndexedPet {
                index,
                pet: pet.clone(),
            };
            if pet.adopted {
                partition.adopted.push(entry);
            } else {
                partition.available.push(entry);
            }
        }
        partition
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.adopted.is_empty()
    }

    pub fn total(&self) -> usize {
        self.available.len() + self.adopted.len()
    }
}
