use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use petboard_types::PetRecord;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// The persisted document: a JSON array of pet records.
///
/// Written pretty-printed with two-space indentation. Saves go to a
/// temporary sibling file that is then renamed over the document, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the document at `path`, creating an empty one if missing.
    ///
    /// Records written without an `id` are assigned one and the document is
    /// rewritten once, so identifiers stay stable across loads.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = Self { path };
        if !store.path.exists() {
            info!(path = %store.path.display(), "creating empty pet document");
            store.save(&[])?;
        } else {
            store.assign_missing_ids()?;
        }
        Ok(store)
    }

    /// Path of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn assign_missing_ids(&self) -> StoreResult<()> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "pet document unreadable at open");
                return Ok(());
            }
        };
        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&raw) else {
            warn!(path = %self.path.display(), "pet document is not a JSON array; leaving untouched");
            return Ok(());
        };
        let missing = items
            .iter()
            .filter(|item| item.get("id").is_none())
            .count();
        if missing == 0 {
            return Ok(());
        }
        let records = match self.load() {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "pet document has unreadable records; leaving untouched"
                );
                return Ok(());
            }
        };
        self.save(&records)?;
        info!(path = %self.path.display(), missing, "assigned ids to legacy pet records");
        Ok(())
    }

    fn parse_error(&self, reason: impl ToString) -> StoreError {
        StoreError::Parse {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StoreResult<Vec<PetRecord>> {
        let raw = fs::read_to_string(&self.path)?;
        let records: Vec<PetRecord> =
            serde_json::from_str(&raw).map_err(|e| self.parse_error(e))?;
        debug!(path = %self.path.display(), count = records.len(), "loaded pet records");
        Ok(records)
    }

    fn save(&self, records: &[PetRecord]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), count = records.len(), "saved pet records");
        Ok(())
    }
}
