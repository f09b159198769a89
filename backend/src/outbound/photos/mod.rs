//! Proof photo storage.

mod fs_photo_store;

pub use fs_photo_store::{FsPhotoStore, FsPhotoStoreError};
