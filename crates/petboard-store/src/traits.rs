use petboard_types::PetRecord;

use crate::error::StoreResult;

/// Whole-collection record store.
///
/// Implementations must satisfy these invariants:
/// - `save` replaces the entire persisted collection.
/// - After a successful `save`, `load` returns the same records in the same
///   order with all fields present.
/// - `load` has no side effects.
pub trait RecordStore: Send + Sync {
    /// Read the full collection in order.
    fn load(&self) -> StoreResult<Vec<PetRecord>>;

    /// Overwrite the full collection.
    fn save(&self, records: &[PetRecord]) -> StoreResult<()>;

    /// Read the full collection, degrading to empty on any failure.
    ///
    /// The listing page must render even when the document is unreadable;
    /// the failure is logged rather than surfaced.
    fn load_or_empty(&self) -> Vec<PetRecord> {
        match self.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load pet records; using empty collection");
                Vec::new()
            }
        }
    }
}
