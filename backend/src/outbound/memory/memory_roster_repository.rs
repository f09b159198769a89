//! Volatile `RosterRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{RosterRepository, RosterRepositoryError};
use crate::domain::{
    BathroomAssignment, PhotoName, RosterSnapshot, Task, TaskCompletion, WeeklyRoster,
};

#[derive(Debug, Default)]
struct Store {
    rosters: Vec<WeeklyRoster>,
    tasks: Vec<Task>,
    completions: HashMap<Uuid, TaskCompletion>,
    bathrooms: Vec<BathroomAssignment>,
}

impl Store {
    fn roster_ids(&self, roster_id: &Uuid) -> bool {
        self.rosters.iter().any(|roster| roster.id == *roster_id)
    }

    fn standing_conflict(&self, tasks: &[Task], bathrooms: &[BathroomAssignment]) -> bool {
        let task_clash = tasks.iter().any(|new| {
            new.standing_kind.is_some()
                && self.tasks.iter().any(|task| {
                    task.roster_id == new.roster_id && task.standing_kind == new.standing_kind
                })
        });
        let bathroom_clash = bathrooms.iter().any(|new| {
            self.bathrooms.iter().any(|existing| {
                existing.roster_id == new.roster_id && existing.bathroom == new.bathroom
            })
        });
        task_clash || bathroom_clash
    }
}

/// [`RosterRepository`] backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryRosterRepository {
    store: RwLock<Store>,
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn find_roster_by_week_start(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .rosters
            .iter()
            .find(|roster| roster.week.start() == week_start)
            .cloned())
    }

    async fn find_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .rosters
            .iter()
            .find(|roster| roster.id == *roster_id)
            .cloned())
    }

    async fn find_latest_roster_before(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .rosters
            .iter()
            .filter(|roster| roster.week.start() < week_start)
            .max_by_key(|roster| roster.week.start())
            .cloned())
    }

    async fn list_rosters(&self) -> Result<Vec<WeeklyRoster>, RosterRepositoryError> {
        let store = self.store.read().await;
        let mut rosters = store.rosters.clone();
        rosters.sort_by(|a, b| b.week.start().cmp(&a.week.start()));
        Ok(rosters)
    }

    async fn create_roster(&self, snapshot: &RosterSnapshot) -> Result<(), RosterRepositoryError> {
        let mut store = self.store.write().await;
        let week_start = snapshot.roster.week.start();
        if store
            .rosters
            .iter()
            .any(|roster| roster.week.start() == week_start)
        {
            return Err(RosterRepositoryError::conflict(format!(
                "roster for week starting {week_start} already exists"
            )));
        }
        store.rosters.push(snapshot.roster.clone());
        store.tasks.extend(snapshot.tasks.iter().cloned());
        store.bathrooms.extend(snapshot.bathrooms.iter().cloned());
        Ok(())
    }

    async fn add_standing_items(
        &self,
        tasks: &[Task],
        bathrooms: &[BathroomAssignment],
    ) -> Result<(), RosterRepositoryError> {
        let mut store = self.store.write().await;
        if store.standing_conflict(tasks, bathrooms) {
            return Err(RosterRepositoryError::conflict(
                "standing item already exists",
            ));
        }
        store.tasks.extend(tasks.iter().cloned());
        store.bathrooms.extend(bathrooms.iter().cloned());
        Ok(())
    }

    async fn tasks_for_roster(&self, roster_id: &Uuid) -> Result<Vec<Task>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .tasks
            .iter()
            .filter(|task| task.roster_id == *roster_id)
            .cloned()
            .collect())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RosterRepositoryError> {
        let store = self.store.read().await;
        let mut tasks = store.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn find_task(&self, task_id: &Uuid) -> Result<Option<Task>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store.tasks.iter().find(|task| task.id == *task_id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> Result<(), RosterRepositoryError> {
        let mut store = self.store.write().await;
        if !store.roster_ids(&task.roster_id) {
            return Err(RosterRepositoryError::query(format!(
                "roster {} does not exist",
                task.roster_id
            )));
        }
        if store.tasks.iter().any(|existing| existing.id == task.id)
            || store.standing_conflict(std::slice::from_ref(task), &[])
        {
            return Err(RosterRepositoryError::conflict(format!(
                "task {} already exists",
                task.id
            )));
        }
        store.tasks.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<bool, RosterRepositoryError> {
        let mut store = self.store.write().await;
        let Some(existing) = store.tasks.iter_mut().find(|existing| existing.id == task.id) else {
            return Ok(false);
        };
        existing.name.clone_from(&task.name);
        existing.assigned_to = task.assigned_to;
        Ok(true)
    }

    async fn delete_task(&self, task_id: &Uuid) -> Result<bool, RosterRepositoryError> {
        let mut store = self.store.write().await;
        let before = store.tasks.len();
        store.tasks.retain(|task| task.id != *task_id);
        if store.tasks.len() == before {
            return Ok(false);
        }
        store.completions.remove(task_id);
        Ok(true)
    }

    async fn completions_for_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Vec<TaskCompletion>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .tasks
            .iter()
            .filter(|task| task.roster_id == *roster_id)
            .filter_map(|task| store.completions.get(&task.id).cloned())
            .collect())
    }

    async fn list_completions(&self) -> Result<Vec<TaskCompletion>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store.completions.values().cloned().collect())
    }

    async fn find_completion(
        &self,
        task_id: &Uuid,
    ) -> Result<Option<TaskCompletion>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store.completions.get(task_id).cloned())
    }

    async fn insert_completion(
        &self,
        completion: &TaskCompletion,
    ) -> Result<(), RosterRepositoryError> {
        let mut store = self.store.write().await;
        if !store.tasks.iter().any(|task| task.id == completion.task_id) {
            return Err(RosterRepositoryError::query(format!(
                "task {} does not exist",
                completion.task_id
            )));
        }
        if store.completions.contains_key(&completion.task_id) {
            return Err(RosterRepositoryError::conflict(format!(
                "task {} is already completed",
                completion.task_id
            )));
        }
        store
            .completions
            .insert(completion.task_id, completion.clone());
        Ok(())
    }

    async fn bathrooms_for_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Vec<BathroomAssignment>, RosterRepositoryError> {
        let store = self.store.read().await;
        let mut bathrooms: Vec<_> = store
            .bathrooms
            .iter()
            .filter(|assignment| assignment.roster_id == *roster_id)
            .cloned()
            .collect();
        bathrooms.sort_by_key(|assignment| assignment.bathroom);
        Ok(bathrooms)
    }

    async fn find_bathroom(
        &self,
        assignment_id: &Uuid,
    ) -> Result<Option<BathroomAssignment>, RosterRepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .bathrooms
            .iter()
            .find(|assignment| assignment.id == *assignment_id)
            .cloned())
    }

    async fn update_bathroom(
        &self,
        assignment: &BathroomAssignment,
    ) -> Result<bool, RosterRepositoryError> {
        let mut store = self.store.write().await;
        let Some(existing) = store
            .bathrooms
            .iter_mut()
            .find(|existing| existing.id == assignment.id)
        else {
            return Ok(false);
        };
        existing.assigned_to = assignment.assigned_to;
        existing.cleaning_mode = assignment.cleaning_mode;
        Ok(true)
    }

    async fn complete_bathroom(
        &self,
        assignment_id: &Uuid,
        completed_at: DateTime<Utc>,
        proof_photos: &[PhotoName],
    ) -> Result<bool, RosterRepositoryError> {
        let mut store = self.store.write().await;
        let Some(existing) = store
            .bathrooms
            .iter_mut()
            .find(|existing| existing.id == *assignment_id)
        else {
            return Ok(false);
        };
        if existing.completed_at.is_some() {
            return Err(RosterRepositoryError::conflict(format!(
                "bathroom assignment {assignment_id} is already completed"
            )));
        }
        existing.completed_at = Some(completed_at);
        existing.proof_photos = proof_photos.to_vec();
        Ok(true)
    }
}
