//! Internal Diesel row structs.
//!
//! Rows carry database representations (text enums, signed integers) and are
//! converted to domain types in the repository modules. They never leave the
//! persistence layer.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bathroom_assignments, task_completions, tasks, user_accounts, weekly_rosters};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = weekly_rosters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WeeklyRosterRow {
    pub id: Uuid,
    pub week_start_date: NaiveDate,
    pub week_number: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub roster_id: Uuid,
    pub name: String,
    pub assigned_to: String,
    pub standing_kind: Option<String>,
    pub rotation_index: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub(crate) struct TaskUpdate<'a> {
    pub name: &'a str,
    pub assigned_to: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_completions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskCompletionRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub proof_photos: Vec<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bathroom_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BathroomAssignmentRow {
    pub id: Uuid,
    pub roster_id: Uuid,
    pub bathroom_number: i16,
    pub assigned_to: String,
    pub cleaning_mode: String,
    pub rotation_index: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub proof_photos: Vec<String>,
}

/// Editable bathroom assignment columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bathroom_assignments)]
pub(crate) struct BathroomAssignmentUpdate<'a> {
    pub assigned_to: &'a str,
    pub cleaning_mode: &'a str,
}

/// Columns written when a bathroom assignment is completed.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bathroom_assignments)]
pub(crate) struct BathroomCompletionUpdate<'a> {
    pub completed_at: DateTime<Utc>,
    pub proof_photos: &'a [String],
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub id: Uuid,
    pub username: String,
    pub resident: String,
    pub role: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_accounts)]
pub(crate) struct NewUserAccountRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub resident: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}
