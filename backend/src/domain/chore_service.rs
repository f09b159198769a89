//! Task and bathroom mutations, completions and proof photos.
//!
//! Completions follow a fixed order: existence check, duplicate check, photo
//! write, completion write, then a detached notification. Notification
//! failures are logged and never reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ChoreCommand, ChoreQuery, CompleteBathroomRequest, CompleteTaskRequest, CompletionNotice,
    CompletionNotifier, CreateCustomTaskRequest, NoOpCompletionNotifier, PhotoStore,
    PhotoStoreError, RosterCommand, RosterRepository, StoredPhoto, UpdateBathroomRequest,
    UpdateTaskRequest,
};
use crate::domain::roster_service::map_repository_error;
use crate::domain::{
    BathroomAssignment, Error, PhotoName, PhotoUpload, Resident, Task, TaskCompletion, TaskView,
    TraceId, task_views,
};

/// Driving-port implementation for chores.
#[derive(Clone)]
pub struct ChoreService<R> {
    repo: Arc<R>,
    roster: Arc<dyn RosterCommand>,
    photos: Arc<dyn PhotoStore>,
    notifier: Arc<dyn CompletionNotifier>,
    clock: Arc<dyn Clock>,
    photo_base_url: String,
}

impl<R> ChoreService<R> {
    /// Create a service that does not send notifications.
    pub fn new(
        repo: Arc<R>,
        roster: Arc<dyn RosterCommand>,
        photos: Arc<dyn PhotoStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            roster,
            photos,
            notifier: Arc::new(NoOpCompletionNotifier),
            clock,
            photo_base_url: "/api/v1/photos".to_owned(),
        }
    }

    /// Announce completions through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn CompletionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Prefix used to build public photo links in notifications.
    #[must_use]
    pub fn with_photo_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.photo_base_url = base_url.into();
        self
    }

    fn photo_url(&self, name: &PhotoName) -> String {
        format!("{}/{name}", self.photo_base_url.trim_end_matches('/'))
    }
}

fn map_photo_error(error: PhotoStoreError) -> Error {
    Error::internal(format!("photo store error: {error}"))
}

fn validated_name(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("task name must not be empty"));
    }
    Ok(trimmed.to_owned())
}

impl<R> ChoreService<R>
where
    R: RosterRepository,
{
    async fn existing_task(&self, task_id: &Uuid) -> Result<Task, Error> {
        self.repo
            .find_task(task_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("task {task_id} not found")))
    }

    async fn existing_bathroom(&self, assignment_id: &Uuid) -> Result<BathroomAssignment, Error> {
        self.repo
            .find_bathroom(assignment_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("bathroom assignment {assignment_id} not found")))
    }

    async fn store_photo(
        &self,
        upload: Option<&PhotoUpload>,
        now: DateTime<Utc>,
    ) -> Result<Option<PhotoName>, Error> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        let name = PhotoName::generate(now, upload.original_name());
        self.photos
            .save(&name, upload.bytes())
            .await
            .map_err(map_photo_error)?;
        Ok(Some(name))
    }

    /// Send the completion notice on a detached task.
    fn announce(&self, resident: Resident, chore: &str, photo: &PhotoName) {
        let notice = CompletionNotice {
            resident,
            chore: chore.to_owned(),
            photo_url: self.photo_url(photo),
            file_name: photo.to_string(),
        };
        let notifier = Arc::clone(&self.notifier);
        let trace_id = TraceId::current();
        tokio::spawn(async move {
            let send = async {
                if let Err(error) = notifier.notify_completion(&notice).await {
                    warn!(
                        %error,
                        resident = %notice.resident,
                        chore = %notice.chore,
                        "completion notification failed"
                    );
                }
            };
            match trace_id {
                Some(trace_id) => TraceId::scope(trace_id, send).await,
                None => send.await,
            }
        });
    }
}

#[async_trait]
impl<R> ChoreCommand for ChoreService<R>
where
    R: RosterRepository,
{
    async fn create_custom_task(&self, request: CreateCustomTaskRequest) -> Result<Task, Error> {
        let name = validated_name(&request.name)?;
        let roster = self.roster.ensure_current_week().await?;
        let task = Task {
            id: Uuid::new_v4(),
            roster_id: roster.id,
            name,
            assigned_to: request.assigned_to,
            standing_kind: None,
            rotation_index: None,
            created_at: self.clock.utc(),
        };
        self.repo
            .insert_task(&task)
            .await
            .map_err(map_repository_error)?;
        info!(task_id = %task.id, roster_id = %roster.id, "custom task created");
        Ok(task)
    }

    async fn update_task(&self, request: UpdateTaskRequest) -> Result<Task, Error> {
        let name = request.name.as_deref().map(validated_name).transpose()?;
        let mut task = self.existing_task(&request.task_id).await?;
        if let Some(name) = name {
            task.name = name;
        }
        if let Some(assignee) = request.assigned_to {
            task.assigned_to = assignee;
        }

        let updated = self
            .repo
            .update_task(&task)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("task {} not found", task.id)));
        }
        Ok(task)
    }

    async fn delete_task(&self, task_id: &Uuid) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete_task(task_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("task {task_id} not found")));
        }
        info!(%task_id, "task deleted");
        Ok(())
    }

    async fn complete_task(&self, request: CompleteTaskRequest) -> Result<TaskCompletion, Error> {
        let task = self.existing_task(&request.task_id).await?;
        let already_done = self
            .repo
            .find_completion(&task.id)
            .await
            .map_err(map_repository_error)?;
        if already_done.is_some() {
            return Err(Error::conflict(format!("task {} is already completed", task.id)));
        }

        let now = self.clock.utc();
        let photo = self.store_photo(request.photo.as_ref(), now).await?;
        let completion = TaskCompletion {
            id: Uuid::new_v4(),
            task_id: task.id,
            completed_at: now,
            proof_photos: photo.iter().cloned().collect(),
        };
        self.repo
            .insert_completion(&completion)
            .await
            .map_err(map_repository_error)?;
        info!(
            task_id = %task.id,
            resident = %task.assigned_to,
            proof_count = completion.proof_photos.len(),
            "task completed"
        );

        if let Some(photo) = &photo {
            self.announce(task.assigned_to, &task.name, photo);
        }
        Ok(completion)
    }

    async fn update_bathroom(
        &self,
        request: UpdateBathroomRequest,
    ) -> Result<BathroomAssignment, Error> {
        let mut assignment = self.existing_bathroom(&request.assignment_id).await?;
        if let Some(assignee) = request.assigned_to {
            assignment.assigned_to = assignee;
        }
        if let Some(mode) = request.cleaning_mode {
            assignment.cleaning_mode = mode;
        }

        let updated = self
            .repo
            .update_bathroom(&assignment)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "bathroom assignment {} not found",
                assignment.id
            )));
        }
        Ok(assignment)
    }

    async fn complete_bathroom(
        &self,
        request: CompleteBathroomRequest,
    ) -> Result<BathroomAssignment, Error> {
        let mut assignment = self.existing_bathroom(&request.assignment_id).await?;
        if assignment.completed_at.is_some() {
            return Err(Error::conflict(format!(
                "bathroom assignment {} is already completed",
                assignment.id
            )));
        }

        let now = self.clock.utc();
        let photo = self.store_photo(request.photo.as_ref(), now).await?;
        assignment.completed_at = Some(now);
        assignment.proof_photos = photo.iter().cloned().collect();

        let updated = self
            .repo
            .complete_bathroom(&assignment.id, now, &assignment.proof_photos)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "bathroom assignment {} not found",
                assignment.id
            )));
        }
        info!(
            assignment_id = %assignment.id,
            bathroom = %assignment.bathroom,
            resident = %assignment.assigned_to,
            "bathroom completed"
        );

        if let Some(photo) = &photo {
            let chore = format!("Bathroom {}", assignment.bathroom);
            self.announce(assignment.assigned_to, &chore, photo);
        }
        Ok(assignment)
    }
}

#[async_trait]
impl<R> ChoreQuery for ChoreService<R>
where
    R: RosterRepository,
{
    async fn all_tasks(&self) -> Result<Vec<TaskView>, Error> {
        let (tasks, completions) =
            futures_util::try_join!(self.repo.list_tasks(), self.repo.list_completions())
                .map_err(map_repository_error)?;
        Ok(task_views(tasks, completions))
    }

    async fn photo(&self, name: &PhotoName) -> Result<StoredPhoto, Error> {
        let content_type = name
            .content_type()
            .ok_or_else(|| Error::invalid_request("unsupported photo type"))?;
        let bytes = self
            .photos
            .load(name)
            .await
            .map_err(map_photo_error)?
            .ok_or_else(|| Error::not_found(format!("photo {name} not found")))?;
        Ok(StoredPhoto {
            name: name.clone(),
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "chore_service_tests.rs"]
mod tests;
