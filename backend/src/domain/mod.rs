//! Domain primitives, rotation rules and services.
//!
//! Purpose: model the household roster independently of HTTP and storage.
//! Pure rules (week boundaries, rotation advancement, view assembly) live in
//! plain modules; services orchestrate them over the ports in [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload and stable identifiers.
//! - [`RotationPlan`] and friends: deterministic weekly assignment.
//! - [`RosterService`], [`ChoreService`], [`AccountLoginService`]: driving
//!   port implementations.

pub mod account_seeding;
pub mod auth;
pub mod chore_service;
pub mod error;
pub mod login_service;
pub mod photo;
pub mod ports;
pub mod resident;
pub mod roster;
pub mod roster_service;
pub mod roster_view;
pub mod rotation;
pub mod trace_id;
pub mod week;

pub use self::account_seeding::{AccountSeeder, SeedOutcome};
pub use self::auth::{LoginCredentials, LoginValidationError, Principal, Role, UserAccount};
pub use self::chore_service::ChoreService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login_service::AccountLoginService;
pub use self::photo::{MAX_PHOTO_BYTES, PhotoName, PhotoUpload, PhotoValidationError};
pub use self::resident::{Resident, UnknownResident};
pub use self::roster::{BathroomAssignment, RosterSnapshot, Task, TaskCompletion, WeeklyRoster};
pub use self::roster_service::RosterService;
pub use self::roster_view::{
    BathroomView, RosterData, TaskStatus, TaskView, assemble_roster_data, task_views,
};
pub use self::rotation::{
    BathroomNumber, CleaningMode, DerivedBathroom, DerivedRotation, DerivedTask,
    EmptyRotationSequence, InvalidBathroomNumber, PreviousRotation, RotationPlan, RotationSequence,
    RotationSlot, StandingTask, UnknownCleaningMode, UnknownStandingTask,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::week::RosterWeek;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use chore_roster::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("admin only"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
