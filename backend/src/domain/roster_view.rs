//! Read models joining roster rows with their completion state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    BathroomAssignment, BathroomNumber, CleaningMode, PhotoName, Resident, StandingTask, Task,
    TaskCompletion, WeeklyRoster,
};

/// Completion state reported for a task.
///
/// Only two states exist; no deadline rule marks tasks overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// No completion recorded.
    Pending,
    /// A completion exists.
    Completed,
}

/// A task joined with its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
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
    /// Whether the task was added ad hoc.
    pub is_custom_task: bool,
    /// Rotation position.
    pub rotation_index: Option<u32>,
    /// Derived status.
    pub status: TaskStatus,
    /// Completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Number of proof photos.
    pub proof_count: usize,
    /// Proof photo names in upload order.
    pub proof_photos: Vec<PhotoName>,
}

/// A bathroom assignment as shown to residents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BathroomView {
    /// Assignment identifier.
    pub id: Uuid,
    /// Which bathroom.
    pub bathroom: BathroomNumber,
    /// Assignee.
    pub assigned_to: Resident,
    /// Cleaning mode for the week.
    pub cleaning_mode: CleaningMode,
    /// Rotation position.
    pub rotation_index: Option<u32>,
    /// Completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Proof photo names in upload order.
    pub proof_photos: Vec<PhotoName>,
}

impl From<BathroomAssignment> for BathroomView {
    fn from(value: BathroomAssignment) -> Self {
        Self {
            id: value.id,
            bathroom: value.bathroom,
            assigned_to: value.assigned_to,
            cleaning_mode: value.cleaning_mode,
            rotation_index: value.rotation_index,
            completed_at: value.completed_at,
            proof_photos: value.proof_photos,
        }
    }
}

/// Everything shown for one roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterData {
    /// The roster itself.
    pub roster: WeeklyRoster,
    /// Tasks, standing tasks first.
    pub tasks: Vec<TaskView>,
    /// Bathrooms in ascending number.
    pub bathrooms: Vec<BathroomView>,
}

fn task_order(task: &Task) -> (u8, Option<StandingTask>, DateTime<Utc>) {
    (u8::from(task.is_custom()), task.standing_kind, task.created_at)
}

/// Join tasks with at most one completion each.
///
/// Completions for tasks not in `tasks` are ignored. When several
/// completions share a task the earliest wins.
///
/// # Examples
/// ```
/// use chore_roster::domain::task_views;
///
/// assert!(task_views(Vec::new(), Vec::new()).is_empty());
/// ```
#[must_use]
pub fn task_views(mut tasks: Vec<Task>, completions: Vec<TaskCompletion>) -> Vec<TaskView> {
    let mut by_task: HashMap<Uuid, TaskCompletion> = HashMap::new();
    for completion in completions {
        let keep_existing = by_task
            .get(&completion.task_id)
            .is_some_and(|existing| existing.completed_at <= completion.completed_at);
        if !keep_existing {
            by_task.insert(completion.task_id, completion);
        }
    }

    tasks.sort_by_key(task_order);
    tasks
        .into_iter()
        .map(|task| {
            let completion = by_task.remove(&task.id);
            let is_custom_task = task.is_custom();
            let (status, completed_at, proof_photos) = match completion {
                Some(done) => (
                    TaskStatus::Completed,
                    Some(done.completed_at),
                    done.proof_photos,
                ),
                None => (TaskStatus::Pending, None, Vec::new()),
            };
            TaskView {
                id: task.id,
                roster_id: task.roster_id,
                name: task.name,
                assigned_to: task.assigned_to,
                standing_kind: task.standing_kind,
                is_custom_task,
                rotation_index: task.rotation_index,
                status,
                completed_at,
                proof_count: proof_photos.len(),
                proof_photos,
            }
        })
        .collect()
}

/// Assemble the view of one roster.
#[must_use]
pub fn assemble_roster_data(
    roster: WeeklyRoster,
    tasks: Vec<Task>,
    completions: Vec<TaskCompletion>,
    mut bathrooms: Vec<BathroomAssignment>,
) -> RosterData {
    bathrooms.sort_by_key(|assignment| assignment.bathroom);
    RosterData {
        roster,
        tasks: task_views(tasks, completions),
        bathrooms: bathrooms.into_iter().map(BathroomView::from).collect(),
    }
}
