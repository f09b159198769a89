//! Driving ports for authentication and account listing.
//!
//! Inbound adapters authenticate through [`LoginService`] and receive a
//! [`Principal`]; the role it carries may be elevated for the session
//! without touching the stored account.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, LoginCredentials, Principal, Resident, Role};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the session claim.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;
}

/// Public view of a login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Account identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Resident the account belongs to.
    pub name: Resident,
    /// Stored role.
    pub role: Role,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All accounts ordered by username.
    async fn list_users(&self) -> Result<Vec<AccountSummary>, Error>;
}
