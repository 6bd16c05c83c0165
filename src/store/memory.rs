use std::sync::{Arc, Mutex};

use super::{ProfileStore, StoreError};
use crate::model::UserProfile;

/// In-process store. Clones share the same slot, so a caller can keep a
/// clone to inspect what was saved through a boxed handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: &UserProfile) -> Result<Self, StoreError> {
        let store = Self::new();
        *store.lock() = Some(serde_json::to_string(profile)?);
        Ok(store)
    }

    /// Raw saved JSON, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        match self.lock().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        *self.lock() = Some(serde_json::to_string(profile)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        *self.lock() = None;
        Ok(())
    }
}
