//! PostgreSQL-backed `RosterRepository` implementation using Diesel ORM.
//!
//! Weekly snapshots are written in one transaction so a roster never becomes
//! visible without its standing tasks and bathroom assignments. The unique
//! index on `weekly_rosters.week_start_date` arbitrates concurrent creation;
//! the loser receives [`RosterRepositoryError::Conflict`].

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RosterRepository, RosterRepositoryError};
use crate::domain::{
    BathroomAssignment, BathroomNumber, CleaningMode, PhotoName, Resident, RosterSnapshot,
    RosterWeek, StandingTask, Task, TaskCompletion, WeeklyRoster,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    BathroomAssignmentRow, BathroomAssignmentUpdate, BathroomCompletionUpdate, TaskCompletionRow,
    TaskRow, TaskUpdate, WeeklyRosterRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{bathroom_assignments, task_completions, tasks, weekly_rosters};

/// Diesel-backed implementation of the [`RosterRepository`] port.
#[derive(Clone)]
pub struct DieselRosterRepository {
    pool: DbPool,
}

impl DieselRosterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, AsyncPgConnection>,
        RosterRepositoryError,
    > {
        self.pool.get().await.map_err(map_pool_error)
    }
}

fn map_pool_error(error: PoolError) -> RosterRepositoryError {
    map_basic_pool_error(error, RosterRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> RosterRepositoryError {
    map_basic_diesel_error(
        error,
        RosterRepositoryError::query,
        RosterRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`], reporting unique violations as conflicts.
fn map_write_error(error: DieselError, conflict: impl FnOnce() -> String) -> RosterRepositoryError {
    if is_unique_violation(&error) {
        return RosterRepositoryError::conflict(conflict());
    }
    map_diesel_error(error)
}

fn corrupt(column: &str, error: impl std::fmt::Display) -> RosterRepositoryError {
    RosterRepositoryError::query(format!("stored {column} is invalid: {error}"))
}

fn index_from_db(value: Option<i32>) -> Result<Option<u32>, RosterRepositoryError> {
    value
        .map(|index| u32::try_from(index).map_err(|err| corrupt("rotation_index", err)))
        .transpose()
}

fn index_to_db(value: Option<u32>) -> Result<Option<i32>, RosterRepositoryError> {
    value
        .map(|index| {
            i32::try_from(index)
                .map_err(|_| RosterRepositoryError::query("rotation index out of range"))
        })
        .transpose()
}

fn resident_from_db(value: &str) -> Result<Resident, RosterRepositoryError> {
    Resident::from_str(value).map_err(|err| corrupt("resident", err))
}

fn photos_from_db(values: Vec<String>) -> Result<Vec<PhotoName>, RosterRepositoryError> {
    values
        .into_iter()
        .map(|value| PhotoName::new(value).map_err(|err| corrupt("proof_photos", err)))
        .collect()
}

fn photos_to_db(values: &[PhotoName]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn row_to_roster(row: WeeklyRosterRow) -> WeeklyRoster {
    WeeklyRoster {
        id: row.id,
        week: RosterWeek::starting_on(row.week_start_date),
        created_at: row.created_at,
    }
}

fn roster_to_row(roster: &WeeklyRoster) -> Result<WeeklyRosterRow, RosterRepositoryError> {
    let week_number = i32::try_from(roster.week.week_number())
        .map_err(|_| RosterRepositoryError::query("week number out of range"))?;
    Ok(WeeklyRosterRow {
        id: roster.id,
        week_start_date: roster.week.start(),
        week_number,
        year: roster.week.year(),
        created_at: roster.created_at,
    })
}

fn row_to_task(row: TaskRow) -> Result<Task, RosterRepositoryError> {
    let standing_kind = row
        .standing_kind
        .as_deref()
        .map(|kind| StandingTask::from_str(kind).map_err(|err| corrupt("standing_kind", err)))
        .transpose()?;
    Ok(Task {
        id: row.id,
        roster_id: row.roster_id,
        name: row.name,
        assigned_to: resident_from_db(&row.assigned_to)?,
        standing_kind,
        rotation_index: index_from_db(row.rotation_index)?,
        created_at: row.created_at,
    })
}

fn task_to_row(task: &Task) -> Result<TaskRow, RosterRepositoryError> {
    Ok(TaskRow {
        id: task.id,
        roster_id: task.roster_id,
        name: task.name.clone(),
        assigned_to: task.assigned_to.name().to_owned(),
        standing_kind: task.standing_kind.map(|kind| kind.key().to_owned()),
        rotation_index: index_to_db(task.rotation_index)?,
        created_at: task.created_at,
    })
}

fn row_to_completion(row: TaskCompletionRow) -> Result<TaskCompletion, RosterRepositoryError> {
    Ok(TaskCompletion {
        id: row.id,
        task_id: row.task_id,
        completed_at: row.completed_at,
        proof_photos: photos_from_db(row.proof_photos)?,
    })
}

fn completion_to_row(completion: &TaskCompletion) -> TaskCompletionRow {
    TaskCompletionRow {
        id: completion.id,
        task_id: completion.task_id,
        completed_at: completion.completed_at,
        proof_photos: photos_to_db(&completion.proof_photos),
    }
}

fn row_to_bathroom(row: BathroomAssignmentRow) -> Result<BathroomAssignment, RosterRepositoryError> {
    Ok(BathroomAssignment {
        id: row.id,
        roster_id: row.roster_id,
        bathroom: BathroomNumber::try_from(i64::from(row.bathroom_number))
            .map_err(|err| corrupt("bathroom_number", err))?,
        assigned_to: resident_from_db(&row.assigned_to)?,
        cleaning_mode: CleaningMode::from_str(&row.cleaning_mode)
            .map_err(|err| corrupt("cleaning_mode", err))?,
        rotation_index: index_from_db(row.rotation_index)?,
        completed_at: row.completed_at,
        proof_photos: photos_from_db(row.proof_photos)?,
    })
}

fn bathroom_to_row(
    assignment: &BathroomAssignment,
) -> Result<BathroomAssignmentRow, RosterRepositoryError> {
    Ok(BathroomAssignmentRow {
        id: assignment.id,
        roster_id: assignment.roster_id,
        bathroom_number: i16::from(assignment.bathroom.number()),
        assigned_to: assignment.assigned_to.name().to_owned(),
        cleaning_mode: assignment.cleaning_mode.as_str().to_owned(),
        rotation_index: index_to_db(assignment.rotation_index)?,
        completed_at: assignment.completed_at,
        proof_photos: photos_to_db(&assignment.proof_photos),
    })
}

fn collect<R, T>(
    rows: Vec<R>,
    convert: fn(R) -> Result<T, RosterRepositoryError>,
) -> Result<Vec<T>, RosterRepositoryError> {
    rows.into_iter().map(convert).collect()
}

/// Insert standing rows inside an open transaction.
async fn insert_standing_rows(
    conn: &mut AsyncPgConnection,
    task_rows: &[TaskRow],
    bathroom_rows: &[BathroomAssignmentRow],
) -> Result<(), DieselError> {
    if !task_rows.is_empty() {
        diesel::insert_into(tasks::table)
            .values(task_rows)
            .execute(conn)
            .await?;
    }
    if !bathroom_rows.is_empty() {
        diesel::insert_into(bathroom_assignments::table)
            .values(bathroom_rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl RosterRepository for DieselRosterRepository {
    async fn find_roster_by_week_start(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let row = weekly_rosters::table
            .filter(weekly_rosters::week_start_date.eq(week_start))
            .select(WeeklyRosterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_roster))
    }

    async fn find_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let row = weekly_rosters::table
            .find(roster_id)
            .select(WeeklyRosterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_roster))
    }

    async fn find_latest_roster_before(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyRoster>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let row = weekly_rosters::table
            .filter(weekly_rosters::week_start_date.lt(week_start))
            .order_by(weekly_rosters::week_start_date.desc())
            .select(WeeklyRosterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_roster))
    }

    async fn list_rosters(&self) -> Result<Vec<WeeklyRoster>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<WeeklyRosterRow> = weekly_rosters::table
            .order_by(weekly_rosters::week_start_date.desc())
            .select(WeeklyRosterRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_roster).collect())
    }

    async fn create_roster(&self, snapshot: &RosterSnapshot) -> Result<(), RosterRepositoryError> {
        let roster_row = roster_to_row(&snapshot.roster)?;
        let task_rows = snapshot
            .tasks
            .iter()
            .map(task_to_row)
            .collect::<Result<Vec<_>, _>>()?;
        let bathroom_rows = snapshot
            .bathrooms
            .iter()
            .map(bathroom_to_row)
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.connection().await?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(weekly_rosters::table)
                    .values(&roster_row)
                    .execute(conn)
                    .await?;
                insert_standing_rows(conn, &task_rows, &bathroom_rows).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| {
            map_write_error(err, || {
                format!(
                    "roster for week starting {} already exists",
                    snapshot.roster.week.start()
                )
            })
        })
    }

    async fn add_standing_items(
        &self,
        new_tasks: &[Task],
        bathrooms: &[BathroomAssignment],
    ) -> Result<(), RosterRepositoryError> {
        let task_rows = new_tasks
            .iter()
            .map(task_to_row)
            .collect::<Result<Vec<_>, _>>()?;
        let bathroom_rows = bathrooms
            .iter()
            .map(bathroom_to_row)
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.connection().await?;
        conn.transaction(|conn| {
            async move { insert_standing_rows(conn, &task_rows, &bathroom_rows).await }
                .scope_boxed()
        })
        .await
        .map_err(|err| map_write_error(err, || "standing item already exists".to_owned()))
    }

    async fn tasks_for_roster(&self, roster_id: &Uuid) -> Result<Vec<Task>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::roster_id.eq(roster_id))
            .order_by((tasks::created_at, tasks::id))
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect(rows, row_to_task)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TaskRow> = tasks::table
            .order_by((tasks::created_at.desc(), tasks::id))
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect(rows, row_to_task)
    }

    async fn find_task(&self, task_id: &Uuid) -> Result<Option<Task>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let row = tasks::table
            .find(task_id)
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_task).transpose()
    }

    async fn insert_task(&self, task: &Task) -> Result<(), RosterRepositoryError> {
        let row = task_to_row(task)?;
        let mut conn = self.connection().await?;
        diesel::insert_into(tasks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, || format!("task {} already exists", task.id)))?;
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<bool, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let changes = TaskUpdate {
            name: &task.name,
            assigned_to: task.assigned_to.name(),
        };
        let updated = diesel::update(tasks::table.find(task.id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_task(&self, task_id: &Uuid) -> Result<bool, RosterRepositoryError> {
        let task_id = *task_id;
        let mut conn = self.connection().await?;
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        task_completions::table.filter(task_completions::task_id.eq(task_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(tasks::table.find(task_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn completions_for_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Vec<TaskCompletion>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TaskCompletionRow> = task_completions::table
            .inner_join(tasks::table)
            .filter(tasks::roster_id.eq(roster_id))
            .select(TaskCompletionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect(rows, row_to_completion)
    }

    async fn list_completions(&self) -> Result<Vec<TaskCompletion>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TaskCompletionRow> = task_completions::table
            .select(TaskCompletionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect(rows, row_to_completion)
    }

    async fn find_completion(
        &self,
        task_id: &Uuid,
    ) -> Result<Option<TaskCompletion>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let row = task_completions::table
            .filter(task_completions::task_id.eq(task_id))
            .select(TaskCompletionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_completion).transpose()
    }

    async fn insert_completion(
        &self,
        completion: &TaskCompletion,
    ) -> Result<(), RosterRepositoryError> {
        let row = completion_to_row(completion);
        let mut conn = self.connection().await?;
        diesel::insert_into(task_completions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_write_error(err, || {
                    format!("task {} is already completed", completion.task_id)
                })
            })?;
        Ok(())
    }

    async fn bathrooms_for_roster(
        &self,
        roster_id: &Uuid,
    ) -> Result<Vec<BathroomAssignment>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<BathroomAssignmentRow> = bathroom_assignments::table
            .filter(bathroom_assignments::roster_id.eq(roster_id))
            .order_by(bathroom_assignments::bathroom_number)
            .select(BathroomAssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect(rows, row_to_bathroom)
    }

    async fn find_bathroom(
        &self,
        assignment_id: &Uuid,
    ) -> Result<Option<BathroomAssignment>, RosterRepositoryError> {
        let mut conn = self.connection().await?;
        let row = bathroom_assignments::table
            .find(assignment_id)
            .select(BathroomAssignmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_bathroom).transpose()
    }

    async fn update_bathroom(
        &self,
        assignment: &BathroomAssignment,
    ) -> Result<bool, RosterRepositoryError> {
        let changes = BathroomAssignmentUpdate {
            assigned_to: assignment.assigned_to.name(),
            cleaning_mode: assignment.cleaning_mode.as_str(),
        };
        let mut conn = self.connection().await?;
        let updated = diesel::update(bathroom_assignments::table.find(assignment.id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn complete_bathroom(
        &self,
        assignment_id: &Uuid,
        completed_at: DateTime<Utc>,
        proof_photos: &[PhotoName],
    ) -> Result<bool, RosterRepositoryError> {
        let proof_photos = photos_to_db(proof_photos);
        let changes = BathroomCompletionUpdate {
            completed_at,
            proof_photos: &proof_photos,
        };
        let mut conn = self.connection().await?;
        let updated = diesel::update(
            bathroom_assignments::table
                .filter(bathroom_assignments::id.eq(assignment_id))
                .filter(bathroom_assignments::completed_at.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(true);
        }

        let exists: i64 = bathroom_assignments::table
            .filter(bathroom_assignments::id.eq(assignment_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if exists == 0 {
            return Ok(false);
        }
        Err(RosterRepositoryError::conflict(format!(
            "bathroom assignment {assignment_id} is already completed"
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion checks; queries are exercised against PostgreSQL only.

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    fn task_row(standing_kind: Option<&str>, assigned_to: &str) -> TaskRow {
        TaskRow {
            id: Uuid::new_v4(),
            roster_id: Uuid::new_v4(),
            name: "Trash".to_owned(),
            assigned_to: assigned_to.to_owned(),
            standing_kind: standing_kind.map(str::to_owned),
            rotation_index: Some(2),
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
        }
    }

    #[rstest]
    fn standing_task_rows_convert() {
        let task = row_to_task(task_row(Some("trash"), "Perpetua")).expect("valid row");

        assert_eq!(task.standing_kind, Some(StandingTask::Trash));
        assert_eq!(task.assigned_to, Resident::Perpetua);
        assert_eq!(task.rotation_index, Some(2));
        assert_eq!(task_to_row(&task).expect("row").standing_kind.as_deref(), Some("trash"));
    }

    #[rstest]
    #[case(Some("mopping"), "Perpetua")]
    #[case(None, "Nobody")]
    fn corrupt_task_rows_are_query_errors(
        #[case] standing_kind: Option<&str>,
        #[case] assigned_to: &str,
    ) {
        let error = row_to_task(task_row(standing_kind, assigned_to)).expect_err("corrupt row");
        assert!(matches!(error, RosterRepositoryError::Query { .. }));
    }

    #[rstest]
    fn bathroom_rows_reject_unknown_numbers() {
        let row = BathroomAssignmentRow {
            id: Uuid::new_v4(),
            roster_id: Uuid::new_v4(),
            bathroom_number: 4,
            assigned_to: "Dania".to_owned(),
            cleaning_mode: "deep".to_owned(),
            rotation_index: Some(0),
            completed_at: None,
            proof_photos: Vec::new(),
        };

        let error = row_to_bathroom(row).expect_err("bathroom 4 does not exist");
        assert!(matches!(error, RosterRepositoryError::Query { .. }));
    }

    #[rstest]
    fn roster_rows_normalise_to_the_stored_monday() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).expect("date");
        let roster = row_to_roster(WeeklyRosterRow {
            id: Uuid::new_v4(),
            week_start_date: date,
            week_number: 11,
            year: 2025,
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
        });

        assert_eq!(roster.week.start(), date);
        assert_eq!(roster.week.week_number(), 11);
    }
}
