//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PhotoStore`], [`CompletionNotifier`],
//! [`PasswordHasher`]) are implemented by outbound adapters. Driving ports
//! ([`RosterCommand`], [`RosterQuery`], [`ChoreCommand`], [`ChoreQuery`],
//! [`LoginService`], [`UsersQuery`]) are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod chore_command;
mod chore_query;
mod completion_notifier;
mod login_service;
mod password_hasher;
mod photo_store;
mod roster_command;
mod roster_query;
mod roster_repository;
mod user_repository;

#[cfg(test)]
pub use chore_command::MockChoreCommand;
pub use chore_command::{
    ChoreCommand, CompleteBathroomRequest, CompleteTaskRequest, CreateCustomTaskRequest,
    UpdateBathroomRequest, UpdateTaskRequest,
};
#[cfg(test)]
pub use chore_query::MockChoreQuery;
pub use chore_query::{ChoreQuery, StoredPhoto};
#[cfg(test)]
pub use completion_notifier::MockCompletionNotifier;
pub use completion_notifier::{
    CompletionNotice, CompletionNotifier, NoOpCompletionNotifier, NotifierError,
};
#[cfg(test)]
pub use login_service::{MockLoginService, MockUsersQuery};
pub use login_service::{AccountSummary, LoginService, UsersQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::PasswordHasher;
#[cfg(test)]
pub use photo_store::MockPhotoStore;
pub use photo_store::{PhotoStore, PhotoStoreError};
#[cfg(test)]
pub use roster_command::MockRosterCommand;
pub use roster_command::RosterCommand;
#[cfg(test)]
pub use roster_query::MockRosterQuery;
pub use roster_query::RosterQuery;
#[cfg(test)]
pub use roster_repository::MockRosterRepository;
pub use roster_repository::{RosterRepository, RosterRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
