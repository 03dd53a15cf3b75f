//! Foundation types for petboard.
//!
//! Every other petboard crate depends on `petboard-types`.
//!
//! # Key Types
//!
//! - [`PetRecord`] — one adoptable pet plus its adoption status
//! - [`PetId`] — UUID v7 identifier assigned when a record is created
//! - [`PetRef`] — how a mutating request addresses a record (index or id)
//! - [`Partition`] — the listing split into available and adopted groups

pub mod error;
pub mod listing;
pub mod pet;
pub mod reference;

pub use error::TypeError;
pub use listing::{IndexedPet, Partition};
pub use pet::{PetDraft, PetEdit, PetId, PetRecord};
pub use reference::PetRef;
