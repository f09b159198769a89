//! Driving port for admin task listings and stored photos.

use async_trait::async_trait;

use crate::domain::{Error, PhotoName, TaskView};

/// Photo bytes with the media type they are served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Stored name.
    pub name: PhotoName,
    /// `image/jpeg` or `image/png`.
    pub content_type: &'static str,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChoreQuery: Send + Sync {
    /// Every task across all rosters with its completion state.
    async fn all_tasks(&self) -> Result<Vec<TaskView>, Error>;

    /// Load a stored proof photo by name.
    async fn photo(&self, name: &PhotoName) -> Result<StoredPhoto, Error>;
}
