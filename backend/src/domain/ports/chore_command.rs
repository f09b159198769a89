//! Driving port for mutating tasks and bathroom duties.
//!
//! Validation of request shapes happens in the inbound adapter; the service
//! behind this port enforces existence and the one-completion rule.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    BathroomAssignment, CleaningMode, Error, PhotoUpload, Resident, Task, TaskCompletion,
};

/// Request to attach a custom task to the current roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCustomTaskRequest {
    /// Display name, already trimmed and non-empty.
    pub name: String,
    /// Assignee.
    pub assigned_to: Resident,
}

/// Request to rename or reassign a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    /// Task to modify.
    pub task_id: Uuid,
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement assignee.
    pub assigned_to: Option<Resident>,
}

/// Request to mark a task done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTaskRequest {
    /// Task being completed.
    pub task_id: Uuid,
    /// Optional proof photo.
    pub photo: Option<PhotoUpload>,
}

/// Request to change a bathroom duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateBathroomRequest {
    /// Assignment to modify.
    pub assignment_id: Uuid,
    /// Replacement assignee.
    pub assigned_to: Option<Resident>,
    /// Replacement cleaning mode.
    pub cleaning_mode: Option<CleaningMode>,
}

/// Request to mark a bathroom duty done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteBathroomRequest {
    /// Assignment being completed.
    pub assignment_id: Uuid,
    /// Optional proof photo.
    pub photo: Option<PhotoUpload>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChoreCommand: Send + Sync {
    /// Attach a custom, non-rotating task to the current week's roster.
    async fn create_custom_task(&self, request: CreateCustomTaskRequest) -> Result<Task, Error>;

    /// Rename or reassign a task, keeping its kind and rotation index.
    async fn update_task(&self, request: UpdateTaskRequest) -> Result<Task, Error>;

    /// Remove a task and any completion recorded for it.
    async fn delete_task(&self, task_id: &Uuid) -> Result<(), Error>;

    /// Record the single completion for a task.
    ///
    /// # Errors
    ///
    /// `not_found` for an unknown task, `conflict` when it is already done.
    async fn complete_task(&self, request: CompleteTaskRequest) -> Result<TaskCompletion, Error>;

    /// Reassign a bathroom duty or change its mode.
    async fn update_bathroom(
        &self,
        request: UpdateBathroomRequest,
    ) -> Result<BathroomAssignment, Error>;

    /// Mark a bathroom duty done.
    ///
    /// # Errors
    ///
    /// `not_found` for an unknown assignment, `conflict` when it is already
    /// done.
    async fn complete_bathroom(
        &self,
        request: CompleteBathroomRequest,
    ) -> Result<BathroomAssignment, Error>;
}
