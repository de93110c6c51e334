//! Record stores.
//!
//! # File layout
//!
//! ```text
//! products.json   # JSON array of records, newest first
//! products.tmp    # transient, renamed over products.json on every write
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::record::{ProductFields, ProductPatch, ProductRecord};

/// Persistence for product records.
pub trait RecordStore: Send + Sync {
    /// All records, newest first.
    fn list(&self) -> CatalogResult<Vec<ProductRecord>>;

    fn get(&self, id: Uuid) -> CatalogResult<Option<ProductRecord>>;

    /// Insert a new record with a fresh id and timestamps.
    fn create(&self, fields: ProductFields) -> CatalogResult<ProductRecord>;

    /// Apply `patch` and bump `updated_at`.
    fn update(&self, id: Uuid, patch: &ProductPatch) -> CatalogResult<ProductRecord>;

    fn delete(&self, id: Uuid) -> CatalogResult<()>;
}

fn newest_first(records: &mut [ProductRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn create_in(records: &mut Vec<ProductRecord>, fields: ProductFields) -> CatalogResult<ProductRecord> {
    fields.validate()?;
    let record = ProductRecord::new(fields, Utc::now());
    records.insert(0, record.clone());
    Ok(record)
}

fn update_in(
    records: &mut [ProductRecord],
    id: Uuid,
    patch: &ProductPatch,
) -> CatalogResult<ProductRecord> {
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(CatalogError::NotFound { id })?;

    patch.apply(&mut record.fields)?;
    record.updated_at = Utc::now();
    Ok(record.clone())
}

fn delete_in(records: &mut Vec<ProductRecord>, id: Uuid) -> CatalogResult<()> {
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        return Err(CatalogError::NotFound { id });
    }
    Ok(())
}

/// Whole-file JSON store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or empty file reads as an empty catalog.
    fn load(&self) -> CatalogResult<Vec<ProductRecord>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CatalogError::io(&self.path, e)),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&text).map_err(|e| CatalogError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save(&self, records: &[ProductRecord]) -> CatalogResult<()> {
        let json = serde_json::to_string_pretty(records).map_err(|e| CatalogError::Corrupt {
            path: self.path.clone(),
            message: format!("failed to serialize records: {}", e),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json).map_err(|e| CatalogError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| CatalogError::io(&self.path, e))?;

        debug!(path = %self.path.display(), count = records.len(), "saved catalog");
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn list(&self) -> CatalogResult<Vec<ProductRecord>> {
        let mut records = self.load()?;
        newest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: Uuid) -> CatalogResult<Option<ProductRecord>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn create(&self, fields: ProductFields) -> CatalogResult<ProductRecord> {
        let mut records = self.load()?;
        let record = create_in(&mut records, fields)?;
        self.save(&records)?;
        info!(id = %record.id, name = %record.fields.name, "product created");
        Ok(record)
    }

    fn update(&self, id: Uuid, patch: &ProductPatch) -> CatalogResult<ProductRecord> {
        let mut records = self.load()?;
        let record = update_in(&mut records, id, patch)?;
        self.save(&records)?;
        info!(id = %id, "product updated");
        Ok(record)
    }

    fn delete(&self, id: Uuid) -> CatalogResult<()> {
        let mut records = self.load()?;
        delete_in(&mut records, id)?;
        self.save(&records)?;
        info!(id = %id, "product deleted");
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ProductRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<ProductRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn list(&self) -> CatalogResult<Vec<ProductRecord>> {
        let mut records = self.records().clone();
        newest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: Uuid) -> CatalogResult<Option<ProductRecord>> {
        Ok(self.records().iter().find(|r| r.id == id).cloned())
    }

    fn create(&self, fields: ProductFields) -> CatalogResult<ProductRecord> {
        create_in(&mut self.records(), fields)
    }

    fn update(&self, id: Uuid, patch: &ProductPatch) -> CatalogResult<ProductRecord> {
        update_in(&mut self.records(), id, patch)
    }

    fn delete(&self, id: Uuid) -> CatalogResult<()> {
        delete_in(&mut self.records(), id)
    }
}
