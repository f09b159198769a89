//! Roster records: weekly rosters, tasks, completions and bathroom duties.
//!
//! A [`WeeklyRoster`] is created once per week and never mutated afterwards.
//! Its standing tasks and bathroom assignments are created together with it;
//! custom tasks are attached ad hoc and never rotate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{BathroomNumber, CleaningMode, PhotoName, Resident, RosterWeek, StandingTask};

/// One calendar week's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRoster {
    /// Roster identifier.
    pub id: Uuid,
    /// Monday-aligned week this roster covers.
    pub week: RosterWeek,
    /// When the roster was materialised.
    pub created_at: DateTime<Utc>,
}

/// A chore assigned to one resident for one roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task identifier.
    pub id: Uuid,
    /// Owning roster.
    pub roster_id: Uuid,
    /// Display name.
    pub name: String,
    /// Assignee.
    pub assigned_to: Resident,
    /// Standing kind, `None` for custom tasks.
    pub standing_kind: Option<StandingTask>,
    /// Rotation position, `None` for custom tasks.
    pub rotation_index: Option<u32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task was added ad hoc rather than derived by rotation.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        self.standing_kind.is_none()
    }
}

/// Record that a task was done, with optional photo proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
    /// Completion identifier.
    pub id: Uuid,
    /// Completed task.
    pub task_id: Uuid,
    /// When the task was marked done.
    pub completed_at: DateTime<Utc>,
    /// Stored photo names in upload order.
    pub proof_photos: Vec<PhotoName>,
}

/// A bathroom duty for one roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BathroomAssignment {
    /// Assignment identifier.
    pub id: Uuid,
    /// Owning roster.
    pub roster_id: Uuid,
    /// Which bathroom.
    pub bathroom: BathroomNumber,
    /// Assignee.
    pub assigned_to: Resident,
    /// Cleaning mode for the week.
    pub cleaning_mode: CleaningMode,
    /// Rotation position.
    pub rotation_index: Option<u32>,
    /// When the duty was marked done.
    pub completed_at: Option<DateTime<Utc>>,
    /// Stored photo names in upload order.
    pub proof_photos: Vec<PhotoName>,
}

/// A roster together with the standing rows created alongside it.
///
/// Stores persist a snapshot atomically so a roster is never visible without
/// its derived tasks and bathroom assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    /// The roster row.
    pub roster: WeeklyRoster,
    /// Derived standing tasks.
    pub tasks: Vec<Task>,
    /// Derived bathroom assignments.
    pub bathrooms: Vec<BathroomAssignment>,
}
