//! Volatile `UserRepository`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::UserAccount;
use crate::domain::ports::{UserPersistenceError, UserRepository};

/// [`UserRepository`] backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<Vec<UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|existing| existing.username == account.username)
        {
            return Ok(false);
        }
        accounts.push(account.clone());
        Ok(true)
    }

    async fn list_accounts(&self) -> Result<Vec<UserAccount>, UserPersistenceError> {
        let mut accounts = self.accounts.read().await.clone();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }
}
