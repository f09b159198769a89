//! Driven port for proof photo storage.
use async_trait::async_trait;

use crate::domain::PhotoName;

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo storage adapters.
    pub enum PhotoStoreError {
        /// Reading or writing the backing store failed.
        Io { message: String } => "photo store i/o failed: {message}",
    }
}

/// Write-once blob storage keyed by generated photo names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist photo bytes under `name`.
    async fn save(&self, name: &PhotoName, bytes: &[u8]) -> Result<(), PhotoStoreError>;

    /// Read a stored photo. `Ok(None)` when nothing is stored under `name`.
    async fn load(&self, name: &PhotoName) -> Result<Option<Vec<u8>>, PhotoStoreError>;
}
