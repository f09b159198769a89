//! PostgreSQL persistence adapters using Diesel with `diesel-async` and `bb8`.
//!
//! Repositories only translate between the internal row structs in
//! `models.rs` and domain types. Schema and rows never leave this module;
//! every database failure is mapped to the owning port's error type.

mod diesel_basic_error_mapping;
mod diesel_roster_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_roster_repository::DieselRosterRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
