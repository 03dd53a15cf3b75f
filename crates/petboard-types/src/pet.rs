use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Stable identifier for a pet record (UUID v7 for creation ordering).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(uuid::Uuid);

impl PetId {
    /// Generate a new time-ordered pet ID (UUID v7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PetId({})", self.short_id())
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PetId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TypeError::InvalidId(s.to_string()))
    }
}

/// A single adoptable pet as stored in the persisted document.
///
/// `image_url` is set at creation and never rewritten. `adopted` only ever
/// moves from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub name: String,
    pub breed: String,
    /// Free text; not validated as a number.
    pub age: String,
    pub image_url: String,
    #[serde(default)]
    pub adopted: bool,
    /// Documents written before identifiers existed get one on load.
    #[serde(default)]
    pub id: PetId,
}

impl PetRecord {
    /// Overwrite the editable text fields. Blank fields keep their value.
    pub fn apply_edit(&mut self, edit: &PetEdit) {
        for (field, value) in [
            (&mut self.name, &edit.name),
            (&mut self.breed, &edit.breed),
            (&mut self.age, &edit.age),
        ] {
            if !value.is_empty() {
                *field = value.clone();
            }
        }
    }

    /// Mark as adopted. Returns `true` if the flag changed.
    pub fn mark_adopted(&mut self) -> bool {
        let changed = !self.adopted;
        self.adopted = true;
        changed
    }
}

/// Validated text fields of a creation submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PetDraft {
    pub name: String,
    pub breed: String,
    pub age: String,
}

impl PetDraft {
    pub fn new(name: impl Into<String>, breed: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            breed: breed.into(),
            age: age.into(),
        }
    }

    /// Returns `true` when any of the three fields is empty.
    pub fn has_missing_fields(&self) -> bool {
        self.name.is_empty() || self.breed.is_empty() || self.age.is_empty()
    }

    /// Build a fresh, not-yet-adopted record once the photo is stored.
    pub fn into_record(self, image_url: impl Into<String>) -> PetRecord {
        PetRecord {
            name: self.name,
            breed: self.breed,
            age: self.age,
            image_url: image_url.into(),
            adopted: false,
            id: PetId::new(),
        }
    }
}

/// Replacement text for an existing record; blank fields are left as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PetEdit {
    pub name: String,
    pub breed: String,
    pub age: String,
}
