//! Argon2id password hashes in PHC string format.
//!
//! Encoded form: `$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`. Parameters
//! travel with each hash, so stored values stay verifiable if the defaults
//! change.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::domain::ports::PasswordHasher;

/// [`PasswordHasher`] backed by Argon2id with the crate's default cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        match Argon2::default().hash_password(password.as_bytes(), &salt) {
            Ok(hash) => hash.to_string(),
            Err(err) => {
                // An empty encoding never parses, so the account stays locked.
                error!(error = %err, "password hashing failed");
                String::new()
            }
        }
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
