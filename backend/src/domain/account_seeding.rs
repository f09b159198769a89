//! Seeding of the fixed household login accounts.
//!
//! Each resident gets an account whose username is the lower-cased name and
//! whose initial password equals the username. Existing accounts are never
//! touched, so seeding is safe on every start.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::{Error, Resident, Role, UserAccount};

/// Counts reported by [`AccountSeeder::seed_household`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Accounts written by this run.
    pub created: usize,
    /// Accounts that already existed.
    pub existing: usize,
}

/// Creates missing resident accounts.
pub struct AccountSeeder<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountSeeder<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    /// Create a seeder over the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    /// Insert an account for every resident that lacks one.
    pub async fn seed_household(&self) -> Result<SeedOutcome, Error> {
        let mut outcome = SeedOutcome::default();
        for resident in Resident::ALL {
            let username = resident.name().to_ascii_lowercase();
            let account = UserAccount {
                id: Uuid::new_v4(),
                password_hash: self.hasher.hash(&username),
                username,
                resident,
                role: Role::Resident,
            };
            let created = self
                .users
                .insert_if_absent(&account)
                .await
                .map_err(|err| match err {
                    UserPersistenceError::Connection { message } => {
                        Error::service_unavailable(format!("user repository unavailable: {message}"))
                    }
                    UserPersistenceError::Query { message } => {
                        Error::internal(format!("account seeding failed: {message}"))
                    }
                })?;
            if created {
                outcome.created += 1;
                debug!(username = %account.username, "created resident account");
            } else {
                outcome.existing += 1;
            }
        }
        info!(
            created = outcome.created,
            existing = outcome.existing,
            "resident accounts seeded"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| format!("hashed:{password}"));
        hasher
    }

    #[tokio::test]
    async fn seeds_every_resident_with_username_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert_if_absent()
            .withf(|account: &UserAccount| {
                account.username == account.resident.name().to_ascii_lowercase()
                    && account.password_hash == format!("hashed:{}", account.username)
                    && account.role == Role::Resident
            })
            .times(6)
            .returning(|account| Ok(account.resident != Resident::Illy));

        let outcome = AccountSeeder::new(Arc::new(users), Arc::new(hasher()))
            .seed_household()
            .await
            .expect("seeding succeeds");
        assert_eq!(
            outcome,
            SeedOutcome {
                created: 5,
                existing: 1
            }
        );
    }

    #[tokio::test]
    async fn store_errors_stop_seeding() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(UserPersistenceError::query("permission denied")));

        let error = AccountSeeder::new(Arc::new(users), Arc::new(hasher()))
            .seed_household()
            .await
            .expect_err("seeding fails");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
