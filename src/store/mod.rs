//! Profile persistence.
//!
//! The store is a plain key-value document, the same shape a browser's local
//! storage has. Save failures are the caller's to log; nothing here retries.

mod file;
mod memory;

use thiserror::Error;

use crate::model::UserProfile;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Key under which the profile is stored.
pub const USER_DATA_KEY: &str = "learnfi_user_data";
/// Key under which a saved position ledger is stored.
pub const POSITION_LEDGER_KEY: &str = "learnfi_position_ledger";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait ProfileStore: Send {
    /// The saved profile, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<UserProfile>, StoreError>;

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Remove everything this store has saved.
    fn clear(&mut self) -> Result<(), StoreError>;
}
