//! Roster read endpoints and the response shapes shared by chore handlers.
//!
//! ```text
//! GET /api/v1/current-week
//! GET /api/v1/history
//! ```

use actix_web::{get, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    BathroomAssignment, BathroomView, CleaningMode, Error, PhotoName, RosterData, Resident,
    StandingTask, Task, TaskStatus, TaskView, WeeklyRoster,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn photo_names(photos: Vec<PhotoName>) -> Vec<String> {
    photos.into_iter().map(String::from).collect()
}

/// Weekly roster header.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRosterResponse {
    pub id: Uuid,
    /// Monday the week starts on.
    pub week_start_date: NaiveDate,
    /// ISO week number.
    pub week_number: u32,
    /// ISO week-based year.
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl From<WeeklyRoster> for WeeklyRosterResponse {
    fn from(value: WeeklyRoster) -> Self {
        Self {
            id: value.id,
            week_start_date: value.week.start(),
            week_number: value.week.week_number(),
            year: value.week.year(),
            created_at: value.created_at,
        }
    }
}

/// A task with its completion state.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub roster_id: Uuid,
    pub name: String,
    pub assigned_to: Resident,
    pub standing_kind: Option<StandingTask>,
    pub is_custom_task: bool,
    pub rotation_index: Option<u32>,
    pub status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub proof_count: usize,
    pub proof_photos: Vec<String>,
}

impl From<TaskView> for TaskResponse {
    fn from(value: TaskView) -> Self {
        Self {
            id: value.id,
            roster_id: value.roster_id,
            name: value.name,
            assigned_to: value.assigned_to,
            standing_kind: value.standing_kind,
            is_custom_task: value.is_custom_task,
            rotation_index: value.rotation_index,
            status: value.status,
            completed_at: value.completed_at,
            proof_count: value.proof_count,
            proof_photos: photo_names(value.proof_photos),
        }
    }
}

/// A task row as stored, without completion state.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecordResponse {
    pub id: Uuid,
    pub roster_id: Uuid,
    pub name: String,
    pub assigned_to: Resident,
    pub standing_kind: Option<StandingTask>,
    pub is_custom_task: bool,
    pub rotation_index: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskRecordResponse {
    fn from(value: Task) -> Self {
        Self {
            id: value.id,
            roster_id: value.roster_id,
            is_custom_task: value.is_custom(),
            name: value.name,
            assigned_to: value.assigned_to,
            standing_kind: value.standing_kind,
            rotation_index: value.rotation_index,
            created_at: value.created_at,
        }
    }
}

/// A bathroom duty.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BathroomResponse {
    pub id: Uuid,
    /// 1, 2 or 3.
    pub bathroom_number: u8,
    pub assigned_to: Resident,
    pub cleaning_mode: CleaningMode,
    pub rotation_index: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub proof_photos: Vec<String>,
}

impl From<BathroomView> for BathroomResponse {
    fn from(value: BathroomView) -> Self {
        Self {
            id: value.id,
            bathroom_number: value.bathroom.number(),
            assigned_to: value.assigned_to,
            cleaning_mode: value.cleaning_mode,
            rotation_index: value.rotation_index,
            completed_at: value.completed_at,
            proof_photos: photo_names(value.proof_photos),
        }
    }
}

impl From<BathroomAssignment> for BathroomResponse {
    fn from(value: BathroomAssignment) -> Self {
        BathroomView::from(value).into()
    }
}

/// A roster with its tasks and bathroom duties.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterDataResponse {
    pub roster: WeeklyRosterResponse,
    pub tasks: Vec<TaskResponse>,
    pub bathrooms: Vec<BathroomResponse>,
}

impl From<RosterData> for RosterDataResponse {
    fn from(value: RosterData) -> Self {
        Self {
            roster: value.roster.into(),
            tasks: value.tasks.into_iter().map(TaskResponse::from).collect(),
            bathrooms: value
                .bathrooms
                .into_iter()
                .map(BathroomResponse::from)
                .collect(),
        }
    }
}

/// This week's roster, created on first access.
#[utoipa::path(
    get,
    path = "/api/v1/current-week",
    responses(
        (status = 200, description = "Current week", body = RosterDataResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["roster"],
    operation_id = "currentWeek"
)]
#[get("/current-week")]
pub async fn current_week(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RosterDataResponse>> {
    session.require_principal()?;
    let data = state.roster_query.current_week().await?;
    Ok(web::Json(data.into()))
}

/// Every roster, newest week first.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    responses(
        (status = 200, description = "Roster history", body = [RosterDataResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["roster"],
    operation_id = "rosterHistory"
)]
#[get("/history")]
pub async fn history(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RosterDataResponse>>> {
    session.require_principal()?;
    let rosters = state.roster_query.history().await?;
    Ok(web::Json(
        rosters.into_iter().map(RosterDataResponse::from).collect(),
    ))
}
