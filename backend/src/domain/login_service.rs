//! Account-backed authentication.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountSummary, LoginService, PasswordHasher, UserPersistenceError, UserRepository,
    UsersQuery,
};
use crate::domain::{Error, LoginCredentials, Principal, Role, UserAccount};

/// Authenticates against stored accounts and lists them for admins.
///
/// When an admin override password is configured, presenting it for any
/// existing account yields a principal with [`Role::Admin`]; the account's
/// stored role is left untouched.
#[derive(Clone)]
pub struct AccountLoginService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    admin_override: Option<Arc<Zeroizing<String>>>,
}

impl<U, H> AccountLoginService<U, H> {
    /// Create a service without an admin override.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            admin_override: None,
        }
    }

    /// Accept `password` as a session-scoped admin grant.
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn with_admin_override(mut self, password: Option<String>) -> Self {
        self.admin_override = password
            .filter(|value| !value.is_empty())
            .map(|value| Arc::new(Zeroizing::new(value)));
        self
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn principal_for(account: &UserAccount, role: Role) -> Principal {
    Principal {
        user_id: account.id,
        name: account.resident,
        role,
    }
}

#[async_trait]
impl<U, H> LoginService for AccountLoginService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let account = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        let is_override = self
            .admin_override
            .as_ref()
            .is_some_and(|expected| expected.as_str() == credentials.password());
        if is_override {
            info!(username = %account.username, "admin claim granted for session");
            return Ok(principal_for(&account, Role::Admin));
        }

        if self
            .hasher
            .verify(credentials.password(), &account.password_hash)
        {
            Ok(principal_for(&account, account.role))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[async_trait]
impl<U, H> UsersQuery for AccountLoginService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self) -> Result<Vec<AccountSummary>, Error> {
        let accounts = self.users.list_accounts().await.map_err(map_user_error)?;
        Ok(accounts
            .into_iter()
            .map(|account| AccountSummary {
                id: account.id,
                username: account.username,
                name: account.resident,
                role: account.role,
            })
            .collect())
    }
}
