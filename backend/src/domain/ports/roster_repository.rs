//! Driven port for roster persistence.
//!
//! One repository owns rosters, their tasks, task completions and bathroom
//! assignments because roster creation must write all three atomically.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    BathroomAssignment, PhotoName, RosterSnapshot, Task, TaskCompletion, WeeklyRoster,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by roster repository adapters.
    pub enum RosterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "roster repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "roster repository query failed: {message}",
        /// A uniqueness rule rejected the write.
        Conflict { message: String } => "roster repository conflict: {message}",
    }
}

/// Storage for weekly rosters and everything attached to them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Roster whose week starts on `week_start`, if any.
    async fn find_roster_by_week_start(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError>;

    /// Roster by identifier.
    async fn find_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError>;

    /// Most recent roster whose week starts strictly before `week_start`.
    async fn find_latest_roster_before(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError>;

    /// Every roster, newest week first.
    async fn list_rosters(&self) -> Result<Vec<WeeklyRoster>, RosterRepositoryError>;

    /// Persist a roster with its standing rows in one transaction.
    ///
    /// Returns [`RosterRepositoryError::Conflict`] when a roster for the same
    /// week already exists; nothing is written in that case.
    async fn create_roster(&self, snapshot: &RosterSnapshot) -> Result<(), RosterRepositoryError>;

    /// Attach missing standing rows to an existing roster in one transaction.
    async fn add_standing_items(
        &self,
        tasks: &[Task],
        bathrooms: &[BathroomAssignment],
    ) -> Result<(), RosterRepositoryError>;

    /// Tasks belonging to a roster.
    async fn tasks_for_roster(&self, roster_id: &Uuid)
    -> Result<Vec<Task>, RosterRepositoryError>;

    /// Every task across all rosters.
    async fn list_tasks(&self) -> Result<Vec<Task>, RosterRepositoryError>;

    /// Task by identifier.
    async fn find_task(&self, task_id: &Uuid) -> Result<Option<Task>, RosterRepositoryError>;

    /// Insert a new task.
    async fn insert_task(&self, task: &Task) -> Result<(), RosterRepositoryError>;

    /// Overwrite a task's mutable fields. Returns `false` when it is absent.
    async fn update_task(&self, task: &Task) -> Result<bool, RosterRepositoryError>;

    /// Delete a task and its completion. Returns `false` when it is absent.
    async fn delete_task(&self, task_id: &Uuid) -> Result<bool, RosterRepositoryError>;

    /// Completions for tasks of one roster.
    async fn completions_for_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Vec<TaskCompletion>, RosterRepositoryError>;

    /// Every completion across all rosters.
    async fn list_completions(&self) -> Result<Vec<TaskCompletion>, RosterRepositoryError>;

    /// Completion recorded for a task, if any.
    async fn find_completion(
        &self,
        task_id: &Uuid,
    ) -> Result<Option<TaskCompletion>, RosterRepositoryError>;

    /// Record a completion.
    ///
    /// Returns [`RosterRepositoryError::Conflict`] when the task already has
    /// one.
    async fn insert_completion(
        &self,
        completion: &TaskCompletion,
    ) -> Result<(), RosterRepositoryError>;

    /// Bathroom assignments of one roster.
    async fn bathrooms_for_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Vec<BathroomAssignment>, RosterRepositoryError>;

    /// Bathroom assignment by identifier.
    async fn find_bathroom(
        &self,
        assignment_id: &Uuid,
    ) -> Result<Option<BathroomAssignment>, RosterRepositoryError>;

    /// Write the assignee and cleaning mode of a bathroom assignment.
    ///
    /// Completion state is left untouched. Returns `false` when the
    /// assignment is absent.
    async fn update_bathroom(
        &self,
        assignment: &BathroomAssignment,
    ) -> Result<bool, RosterRepositoryError>;

    /// Mark a bathroom assignment completed with its proof photos.
    ///
    /// The write only applies while the assignment is still open; an already
    /// completed assignment yields [`RosterRepositoryError::Conflict`].
    /// Returns `false` when the assignment is absent.
    async fn complete_bathroom(
        &self,
        assignment_id: &Uuid,
        completed_at: DateTime<Utc>,
        proof_photos: &[PhotoName],
    ) -> Result<bool, RosterRepositoryError>;
}
