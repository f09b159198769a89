//! Port abstraction for login account persistence.
use async_trait::async_trait;

use crate::domain::UserAccount;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch an account by its lower-case username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Insert an account unless the username is taken.
    ///
    /// Returns `true` when a row was written.
    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, UserPersistenceError>;

    /// All accounts ordered by username.
    async fn list_accounts(&self) -> Result<Vec<UserAccount>, UserPersistenceError>;
}
