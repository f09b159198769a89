//! `PhotoStore` over a capability-scoped upload directory.
//!
//! All file access goes through a `cap_std::fs::Dir` handle, so a stored
//! name can never address anything outside the upload directory. Writes land
//! in a staging file first and are renamed into place.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::PhotoName;
use crate::domain::ports::{PhotoStore, PhotoStoreError};

/// Failure opening the upload directory.
#[derive(Debug, thiserror::Error)]
#[error("failed to open upload directory {path}: {source}")]
pub struct FsPhotoStoreError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

/// Photo store rooted at a directory on local disk.
#[derive(Clone)]
pub struct FsPhotoStore {
    dir: Arc<Dir>,
}

impl FsPhotoStore {
    /// Open `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`FsPhotoStoreError`] when the directory cannot be created or
    /// opened.
    pub fn open(path: &Path) -> Result<Self, FsPhotoStoreError> {
        let wrap = |source| FsPhotoStoreError {
            path: path.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(wrap)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(wrap)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, PhotoStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || work(&dir))
            .await
            .map_err(|err| PhotoStoreError::io(format!("photo task failed: {err}")))?
            .map_err(|err| PhotoStoreError::io(err.to_string()))
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn save(&self, name: &PhotoName, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        let target = name.to_string();
        let staging = format!(".upload-{}", Uuid::new_v4().simple());
        let bytes = bytes.to_vec();
        self.blocking(move |dir| {
            dir.write(&staging, &bytes)?;
            dir.rename(&staging, dir, &target).inspect_err(|_| {
                let _cleanup = dir.remove_file(&staging);
            })
        })
        .await
    }

    async fn load(&self, name: &PhotoName) -> Result<Option<Vec<u8>>, PhotoStoreError> {
        let target = name.to_string();
        self.blocking(move |dir| match dir.read(&target) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn photo(name: &str) -> PhotoName {
        PhotoName::new(name).expect("valid photo name")
    }

    #[rstest]
    #[tokio::test]
    async fn saved_photos_load_back() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FsPhotoStore::open(&temp.path().join("uploads")).expect("open store");
        let name = photo("1741600000000-sink.jpg");

        store.save(&name, b"jpeg bytes").await.expect("save");

        let loaded = store.load(&name).await.expect("load");
        assert_eq!(loaded.as_deref(), Some(&b"jpeg bytes"[..]));
        assert!(temp.path().join("uploads/1741600000000-sink.jpg").exists());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_photos_are_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FsPhotoStore::open(temp.path()).expect("open store");

        let loaded = store.load(&photo("absent.png")).await.expect("load");
        assert!(loaded.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn saving_twice_replaces_the_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FsPhotoStore::open(temp.path()).expect("open store");
        let name = photo("tub.png");

        store.save(&name, b"first").await.expect("first save");
        store.save(&name, b"second").await.expect("second save");

        let loaded = store.load(&name).await.expect("load");
        assert_eq!(loaded.as_deref(), Some(&b"second"[..]));
    }
}
