use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{POSITION_LEDGER_KEY, ProfileStore, StoreError, USER_DATA_KEY};
use crate::model::UserProfile;

/// Key-value JSON document on disk.
///
/// Every call re-reads the file, so several handles on one path see each
/// other's writes; concurrent writers race and the last one wins.
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

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.read_all()?.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut doc = self.read_all()?;
        doc.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_all(&doc)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut doc = self.read_all()?;
        if doc.remove(key).is_some() {
            self.write_all(&doc)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, doc: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(doc)?;
        // Write-then-rename: readers never see a partial document.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        self.get(USER_DATA_KEY)
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        self.put(USER_DATA_KEY, profile)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.remove(USER_DATA_KEY)?;
        self.remove(POSITION_LEDGER_KEY)
    }
}
