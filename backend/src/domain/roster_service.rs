//! Weekly roster materialisation and read models.
//!
//! [`RosterService`] implements [`RosterCommand`] and [`RosterQuery`]. Every
//! call re-derives from the store; nothing about the rotation is cached in
//! memory, so restarts and multiple replicas behave identically.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use futures_util::future::try_join_all;
use mockable::Clock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::ports::{RosterCommand, RosterQuery, RosterRepository, RosterRepositoryError};
use crate::domain::{
    BathroomAssignment, DerivedRotation, Error, PreviousRotation, RosterData, RosterSnapshot,
    RosterWeek, RotationPlan, Task, WeeklyRoster, assemble_roster_data,
};

/// Rotation engine and roster assembler over a [`RosterRepository`].
#[derive(Clone)]
pub struct RosterService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    plan: Arc<RotationPlan>,
    offset: FixedOffset,
}

impl<R> RosterService<R> {
    /// Create a service using the household plan and UTC week boundaries.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            plan: Arc::new(RotationPlan::default()),
            offset: Utc.fix(),
        }
    }

    /// Replace the rotation plan.
    #[must_use]
    pub fn with_plan(mut self, plan: RotationPlan) -> Self {
        self.plan = Arc::new(plan);
        self
    }

    /// Judge week boundaries in a fixed UTC offset.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

pub(crate) fn map_repository_error(error: RosterRepositoryError) -> Error {
    match error {
        RosterRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("roster store unavailable: {message}"))
        }
        RosterRepositoryError::Query { message } => {
            Error::internal(format!("roster store error: {message}"))
        }
        RosterRepositoryError::Conflict { message } => Error::conflict(message),
    }
}

/// Task and bathroom rows for the derived slots of `roster`.
fn standing_rows(
    roster: &WeeklyRoster,
    derived: DerivedRotation,
    now: DateTime<Utc>,
) -> (Vec<Task>, Vec<BathroomAssignment>) {
    let tasks = derived
        .tasks
        .into_iter()
        .map(|task| Task {
            id: Uuid::new_v4(),
            roster_id: roster.id,
            name: task.kind.display_name().to_owned(),
            assigned_to: task.slot.resident,
            standing_kind: Some(task.kind),
            rotation_index: Some(task.slot.index),
            created_at: now,
        })
        .collect();

    let bathrooms = derived
        .bathrooms
        .into_iter()
        .map(|bathroom| BathroomAssignment {
            id: Uuid::new_v4(),
            roster_id: roster.id,
            bathroom: bathroom.bathroom,
            assigned_to: bathroom.slot.resident,
            cleaning_mode: bathroom.cleaning_mode,
            rotation_index: Some(bathroom.slot.index),
            completed_at: None,
            proof_photos: Vec::new(),
        })
        .collect();

    (tasks, bathrooms)
}

impl<R> RosterService<R>
where
    R: RosterRepository,
{
    async fn previous_rotation(&self, week: &RosterWeek) -> Result<PreviousRotation, Error> {
        let Some(previous) = self
            .repo
            .find_latest_roster_before(week.start())
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(PreviousRotation::default());
        };

        let (tasks, bathrooms) = futures_util::try_join!(
            self.repo.tasks_for_roster(&previous.id),
            self.repo.bathrooms_for_roster(&previous.id),
        )
        .map_err(map_repository_error)?;
        debug!(
            previous_roster_id = %previous.id,
            previous_week = %previous.week.start(),
            "deriving from previous roster"
        );
        Ok(PreviousRotation::from_roster(&tasks, &bathrooms))
    }

    async fn create_week(
        &self,
        week: RosterWeek,
        now: DateTime<Utc>,
    ) -> Result<WeeklyRoster, Error> {
        let roster = WeeklyRoster {
            id: Uuid::new_v4(),
            week,
            created_at: now,
        };
        let derived = self.plan.derive(&self.previous_rotation(&week).await?);
        let (tasks, bathrooms) = standing_rows(&roster, derived, now);
        let snapshot = RosterSnapshot {
            roster,
            tasks,
            bathrooms,
        };

        match self.repo.create_roster(&snapshot).await {
            Ok(()) => {
                info!(
                    roster_id = %snapshot.roster.id,
                    week_start = %week.start(),
                    week_number = week.week_number(),
                    "created weekly roster"
                );
                Ok(snapshot.roster)
            }
            Err(RosterRepositoryError::Conflict { message }) => {
                debug!(
                    week_start = %week.start(),
                    %message,
                    "roster created concurrently; re-reading"
                );
                self.repo
                    .find_roster_by_week_start(week.start())
                    .await
                    .map_err(map_repository_error)?
                    .ok_or_else(|| Error::internal("roster missing after conflicting insert"))
            }
            Err(err) => Err(map_repository_error(err)),
        }
    }

    /// Derive standing items for a roster whose derivation never completed.
    async fn repair(&self, roster: &WeeklyRoster, now: DateTime<Utc>) -> Result<(), Error> {
        let (tasks, bathrooms) = futures_util::try_join!(
            self.repo.tasks_for_roster(&roster.id),
            self.repo.bathrooms_for_roster(&roster.id),
        )
        .map_err(map_repository_error)?;

        // Any standing item means derivation ran; later gaps are admin edits.
        if tasks.iter().any(|task| !task.is_custom()) || !bathrooms.is_empty() {
            return Ok(());
        }

        let derived = self.plan.derive(&self.previous_rotation(&roster.week).await?);
        let (missing_tasks, missing_bathrooms) = standing_rows(roster, derived, now);
        warn!(
            roster_id = %roster.id,
            missing_tasks = missing_tasks.len(),
            missing_bathrooms = missing_bathrooms.len(),
            "repairing partially derived roster"
        );
        match self
            .repo
            .add_standing_items(&missing_tasks, &missing_bathrooms)
            .await
        {
            Ok(()) => Ok(()),
            // A concurrent repair already wrote the standing items.
            Err(RosterRepositoryError::Conflict { message }) => {
                debug!(roster_id = %roster.id, %message, "roster repaired concurrently");
                Ok(())
            }
            Err(error) => Err(map_repository_error(error)),
        }
    }

    async fn assemble(&self, roster: WeeklyRoster) -> Result<RosterData, Error> {
        let (tasks, completions, bathrooms) = futures_util::try_join!(
            self.repo.tasks_for_roster(&roster.id),
            self.repo.completions_for_roster(&roster.id),
            self.repo.bathrooms_for_roster(&roster.id),
        )
        .map_err(map_repository_error)?;
        Ok(assemble_roster_data(roster, tasks, completions, bathrooms))
    }
}

#[async_trait]
impl<R> RosterCommand for RosterService<R>
where
    R: RosterRepository,
{
    async fn ensure_current_week(&self) -> Result<WeeklyRoster, Error> {
        let now = self.clock.utc();
        let week = RosterWeek::containing(now, self.offset);

        let existing = self
            .repo
            .find_roster_by_week_start(week.start())
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(roster) => {
                self.repair(&roster, now).await?;
                Ok(roster)
            }
            None => self.create_week(week, now).await,
        }
    }
}

#[async_trait]
impl<R> RosterQuery for RosterService<R>
where
    R: RosterRepository,
{
    async fn current_week(&self) -> Result<RosterData, Error> {
        let roster = self.ensure_current_week().await?;
        self.assemble(roster).await
    }

    async fn roster_data(&self, roster_id: &Uuid) -> Result<RosterData, Error> {
        let roster = self
            .repo
            .find_roster(roster_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("roster {roster_id} not found")))?;
        self.assemble(roster).await
    }

    async fn history(&self) -> Result<Vec<RosterData>, Error> {
        let rosters = self
            .repo
            .list_rosters()
            .await
            .map_err(map_repository_error)?;
        try_join_all(rosters.into_iter().map(|roster| self.assemble(roster))).await
    }
}

#[cfg(test)]
#[path = "roster_service_tests.rs"]
mod tests;
