//! Durable storage for favorites and visit history
//!
//! Each collection is a named JSON blob holding the full array of country
//! snapshots. Every mutation rewrites the whole blob. Storage problems are logged
//! and never reach the caller: the in-memory collection stays authoritative for
//! the session and the next mutation tries to write again.

use crate::prelude::*;
use countrydex_core::collection::{Collection, CollectionPolicy};
use countrydex_core::country::Country;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const FAVORITES_BLOB: &str = "countryFavorites";
pub const HISTORY_BLOB: &str = "countryHistory";

/// Named blob storage
pub trait BlobStore: Send + Sync {
    /// Contents of the blob, or `None` if it was never written.
    fn read(&self, name: &str) -> Result<Option<String>>;

    fn write(&self, name: &str, contents: &str) -> Result<()>;

    fn delete(&self, name: &str) -> Result<()>;
}

/// Blob storage backed by one `<name>.json` file per blob
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)).into())
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Storage(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        // Write next to the target and rename so a crash never leaves half a blob.
        let path = self.path(name);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to replace {}: {}", path.display(), e)))?;

        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to delete {}: {}", path.display(), e)))?;
        }
        Ok(())
    }
}

/// A named, durable, de-duplicated collection of country snapshots
pub struct PersistedCollection {
    name: String,
    store: Arc<dyn BlobStore>,
    collection: Collection<Country>,
    available: bool,
}

impl PersistedCollection {
    /// Load the collection `name` from `store`.
    ///
    /// A missing blob starts an empty collection. An unreadable or corrupt one does
    /// too, after logging why.
    pub fn load(name: &str, policy: CollectionPolicy, store: Arc<dyn BlobStore>) -> Self {
        let (entries, available) = match store.read(name) {
            Ok(None) => (Vec::new(), true),
            Ok(Some(contents)) => match serde_json::from_str::<Vec<Country>>(&contents) {
                Ok(entries) => (entries, true),
                Err(e) => {
                    log::warn!("Discarding corrupt {} collection: {}", name, e);
                    (Vec::new(), true)
                }
            },
            Err(e) => {
                log::warn!("Collection {} unavailable this session: {:#}", name, e);
                (Vec::new(), false)
            }
        };

        Self {
            name: name.to_string(),
            store,
            collection: Collection::from_entries(policy, entries),
            available,
        }
    }

    pub fn favorites(store: Arc<dyn BlobStore>) -> Self {
        Self::load(FAVORITES_BLOB, CollectionPolicy::favorites(), store)
    }

    pub fn history(store: Arc<dyn BlobStore>) -> Self {
        Self::load(HISTORY_BLOB, CollectionPolicy::history(), store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Country] {
        self.collection.entries()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.collection.contains(key)
    }

    /// Whether the last storage access succeeded.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Key of the stored entry matching a two- or three-letter code.
    pub fn key_for(&self, code: &str) -> Option<String> {
        let code = code.trim();
        self.entries()
            .iter()
            .find(|country| country.has_code(code))
            .map(|country| country.key().to_string())
    }

    /// Add a snapshot of `country`. Returns `false` if its key was already present.
    pub fn add(&mut self, country: Country) -> bool {
        let inserted = self.collection.insert(country);
        if inserted {
            self.persist();
        }
        inserted
    }

    /// Remove the entry with `key`. Absent keys are not an error.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.collection.remove(key);
        self.persist();
        removed
    }

    /// Remove `country` if present, add it otherwise. Returns the new membership.
    pub fn toggle(&mut self, country: Country) -> bool {
        if self.contains(country.key()) {
            let key = country.key().to_string();
            self.remove(&key);
            false
        } else {
            self.add(country);
            true
        }
    }

    pub fn clear(&mut self) {
        self.collection.clear();
        match self.store.delete(&self.name) {
            Ok(()) => self.available = true,
            Err(e) => {
                log::warn!("Failed to clear {} collection: {:#}", self.name, e);
                self.available = false;
            }
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(self.collection.entries())
            .map_err(|e| eyre!("Failed to serialize {} collection: {}", self.name, e))
            .and_then(|contents| self.store.write(&self.name, &contents));

        match result {
            Ok(()) => self.available = true,
            Err(e) => {
                log::warn!("Failed to persist {} collection: {:#}", self.name, e);
                self.available = false;
            }
        }
    }
}
