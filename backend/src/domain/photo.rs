//! Photo proof primitives.
//!
//! Photos are stored under generated names of the form
//! `<unix millis>-<sanitised original name>`; the domain only ever keeps the
//! name, never the bytes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted upload, in bytes.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [(&str, &str); 3] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

/// Validation failures for photo names and uploads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoValidationError {
    /// The name was blank.
    #[error("photo name must not be empty")]
    EmptyName,
    /// The name contained path separators or other unsafe characters.
    #[error("photo name contains unsupported characters: {0}")]
    UnsafeName(String),
    /// The file extension is not an accepted image type.
    #[error("only .jpg, .jpeg and .png photos are accepted")]
    UnsupportedType,
    /// The upload carried no bytes.
    #[error("photo must not be empty")]
    EmptyContent,
    /// The upload exceeded [`MAX_PHOTO_BYTES`].
    #[error("photo exceeds {MAX_PHOTO_BYTES} bytes")]
    TooLarge,
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
}

fn content_type_for(name: &str) -> Option<&'static str> {
    let extension = extension_of(name)?;
    ALLOWED_EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == extension)
        .map(|(_, content_type)| *content_type)
}

/// Opaque stored photo filename.
///
/// ## Invariants
/// - Non-empty, ASCII alphanumerics plus `.`, `_` and `-` only.
/// - Never starts with `.`, so it cannot name a hidden or parent entry.
///
/// # Examples
/// ```
/// use chore_roster::domain::PhotoName;
///
/// assert!(PhotoName::new("1700000000000-sink.jpg").is_ok());
/// assert!(PhotoName::new("../secrets").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoName(String);

impl PhotoName {
    /// Validate an existing stored name.
    pub fn new(raw: impl Into<String>) -> Result<Self, PhotoValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PhotoValidationError::EmptyName);
        }
        if raw.starts_with('.') || !raw.chars().all(is_safe_char) {
            return Err(PhotoValidationError::UnsafeName(raw));
        }
        Ok(Self(raw))
    }

    /// Generate a storage name for an upload received at `now`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>, original_name: &str) -> Self {
        let sanitised: String = original_name
            .chars()
            .map(|c| if is_safe_char(c) { c } else { '_' })
            .collect();
        Self(format!("{}-{sanitised}", now.timestamp_millis()))
    }

    /// MIME type implied by the extension, if it is an accepted image type.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        content_type_for(&self.0)
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhotoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhotoName {
    type Error = PhotoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhotoName> for String {
    fn from(value: PhotoName) -> Self {
        value.0
    }
}

/// A validated photo upload awaiting storage.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    original_name: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("original_name", &self.original_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PhotoUpload {
    /// Validate an uploaded file name and its content.
    ///
    /// # Examples
    /// ```
    /// use chore_roster::domain::PhotoUpload;
    ///
    /// assert!(PhotoUpload::new("bath.png", vec![1, 2, 3]).is_ok());
    /// assert!(PhotoUpload::new("notes.txt", vec![1]).is_err());
    /// ```
    pub fn new(original_name: &str, bytes: Vec<u8>) -> Result<Self, PhotoValidationError> {
        let trimmed = original_name.trim();
        if trimmed.is_empty() {
            return Err(PhotoValidationError::EmptyName);
        }
        if content_type_for(trimmed).is_none() {
            return Err(PhotoValidationError::UnsupportedType);
        }
        if bytes.is_empty() {
            return Err(PhotoValidationError::EmptyContent);
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(PhotoValidationError::TooLarge);
        }
        Ok(Self {
            original_name: trimmed.to_owned(),
            bytes,
        })
    }

    /// Name supplied by the uploader.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn generated_names_are_timestamped_and_sanitised() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).single().expect("instant");
        let name = PhotoName::generate(now, "my sink/photo (1).JPG");
        assert_eq!(name.as_str(), "1700000000123-my_sink_photo__1_.JPG");
        assert_eq!(name.content_type(), Some("image/jpeg"));
    }

    #[rstest]
    #[case("")]
    #[case(".hidden.png")]
    #[case("../etc/passwd")]
    #[case("a/b.png")]
    #[case("a\\b.png")]
    fn rejects_unsafe_names(#[case] raw: &str) {
        assert!(PhotoName::new(raw).is_err());
    }

    #[rstest]
    #[case("1-a.png", Some("image/png"))]
    #[case("1-a.jpeg", Some("image/jpeg"))]
    #[case("1-a.gif", None)]
    #[case("1-noext", None)]
    fn content_type_follows_extension(#[case] raw: &str, #[case] expected: Option<&str>) {
        let name = PhotoName::new(raw).expect("valid name");
        assert_eq!(name.content_type(), expected);
    }

    #[rstest]
    #[case("photo.gif", vec![1], PhotoValidationError::UnsupportedType)]
    #[case("   ", vec![1], PhotoValidationError::EmptyName)]
    #[case("photo.png", vec![], PhotoValidationError::EmptyContent)]
    fn rejects_invalid_uploads(
        #[case] name: &str,
        #[case] bytes: Vec<u8>,
        #[case] expected: PhotoValidationError,
    ) {
        assert_eq!(PhotoUpload::new(name, bytes), Err(expected));
    }

    #[rstest]
    fn rejects_oversized_uploads() {
        let bytes = vec![0_u8; MAX_PHOTO_BYTES + 1];
        assert_eq!(
            PhotoUpload::new("big.png", bytes),
            Err(PhotoValidationError::TooLarge)
        );
    }
}
