//! In-process adapters used when no database is configured and in tests.
//!
//! State lives behind a `tokio::sync::RwLock` and disappears with the
//! process. Uniqueness rules mirror the PostgreSQL constraints so services
//! observe the same conflicts either way.

mod memory_roster_repository;
mod memory_user_repository;

pub use memory_roster_repository::InMemoryRosterRepository;
pub use memory_user_repository::InMemoryUserRepository;
