//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Resident, Role, UserAccount};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserAccountRow, UserAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_accounts;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_account(row: UserAccountRow) -> Result<UserAccount, UserPersistenceError> {
    let resident = Resident::from_str(&row.resident)
        .map_err(|err| UserPersistenceError::query(format!("stored resident is invalid: {err}")))?;
    let role = Role::from_str(&row.role)
        .map_err(|err| UserPersistenceError::query(format!("stored role is invalid: {err}")))?;
    Ok(UserAccount {
        id: row.id,
        username: row.username,
        resident,
        role,
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = user_accounts::table
            .filter(user_accounts::username.eq(username))
            .select(UserAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, UserPersistenceError> {
        let row = NewUserAccountRow {
            id: account.id,
            username: &account.username,
            resident: account.resident.name(),
            role: account.role.as_str(),
            password_hash: &account.password_hash,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(user_accounts::table)
            .values(&row)
            .on_conflict(user_accounts::username)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn list_accounts(&self) -> Result<Vec<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserAccountRow> = user_accounts::table
            .order_by(user_accounts::username)
            .select(UserAccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_account).collect()
    }
}
