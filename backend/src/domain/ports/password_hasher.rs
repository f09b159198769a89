//! Port for one-way password encoding.

/// Encodes and checks passwords without exposing the scheme to services.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Encode `password` with a fresh salt.
    fn hash(&self, password: &str) -> String;

    /// Whether `password` matches a previously encoded value.
    fn verify(&self, password: &str, encoded: &str) -> bool;
}
