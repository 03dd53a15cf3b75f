use std::fmt;

use crate::error::TypeError;
use crate::pet::PetId;

/// How a mutating request addresses a record.
///
/// Listing pages carry both forms. A stable id survives deletes made from
/// another page; a positional index does not. A record another writer added
/// without an id gets a fresh one on every load, so its rendered id never
/// resolves and the index is used instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetRef {
    /// Position in the collection at the time the page was rendered.
    Index(usize),
    /// Identifier assigned at creation.
    Id(PetId),
    /// Id first, then the index when no record carries the id.
    IdOrIndex { id: PetId, index: usize },
}

impl PetRef {
    /// Resolve form fields into a reference.
    ///
    /// A well-formed `pet_id` is preferred and a valid `pet_index` is kept
    /// alongside it. Without a usable id, `pet_index` must parse as a
    /// non-negative integer; `-1`, blanks and non-numeric text are rejected.
    pub fn parse(id_field: Option<&str>, index_field: Option<&str>) -> Result<Self, TypeError> {
        let id = id_field
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<PetId>().ok());
        let index = index_field.map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| TypeError::InvalidReference(raw.to_string()))
        });
        match (id, index) {
            (Some(id), Some(Ok(index))) => Ok(Self::IdOrIndex { id, index }),
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(index)) => index.map(Self::Index),
            (None, None) => Err(TypeError::InvalidReference(
                id_field.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn id(&self) -> Option<PetId> {
        match self {
            Self::Index(_) => None,
            Self::Id(id) | Self::IdOrIndex { id, .. } => Some(*id),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Id(_) => None,
            Self::Index(index) | Self::IdOrIndex { index, .. } => Some(*index),
        }
    }
}

impl fmt::Display for PetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "index:{i}"),
            Self::Id(id) => write!(f, "id:{id}"),
            Self::IdOrIndex { id, index } => write!(f, "id:{id}|index:{index}"),
        }
    }
}
