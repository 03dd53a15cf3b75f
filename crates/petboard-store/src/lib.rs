//! Record storage for petboard.
//!
//! The whole collection lives in one persisted document. Every mutation is
//! a read-modify-write of the full collection: load, change in memory,
//! save. There is no locking between requests; the last writer's snapshot
//! wins.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`JsonFileStore`] -- pretty-printed JSON array on disk
//! - [`InMemoryRecordStore`] -- `Vec`-based store for tests and embedding
//!
//! Mutations on a loaded collection go through [`PetCollection`], which
//! reports an unresolved reference as [`StoreError::NotFound`] and leaves
//! the decision to ignore it to the caller.

pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use collection::PetCollection;
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
