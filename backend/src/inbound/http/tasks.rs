//! Task handlers.
//!
//! ```text
//! GET    /api/v1/admin/tasks
//! POST   /api/v1/tasks {"name":"Water plants","assignedTo":"Illy"}
//! PUT    /api/v1/tasks/{id} {"assignedTo":"Eman"}
//! DELETE /api/v1/tasks/{id}
//! POST   /api/v1/tasks/{id}/complete {"photo":{"fileName":"bin.jpg","contentBase64":"..."}}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{CompleteTaskRequest, CreateCustomTaskRequest, UpdateTaskRequest};
use crate::domain::{Error, TaskCompletion};
use crate::inbound::http::ApiResult;
use crate::inbound::http::roster::{TaskRecordResponse, TaskResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    PhotoPayload, decode_photo, missing_field_error, parse_resident, parse_task_name, parse_uuid,
};

/// Request body for `POST /api/v1/tasks`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: Option<String>,
    pub assigned_to: Option<String>,
}

/// Request body for `PUT /api/v1/tasks/{id}`; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    pub name: Option<String>,
    pub assigned_to: Option<String>,
}

/// Request body for completion endpoints; `{}` completes without proof.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    #[serde(default)]
    pub photo: Option<PhotoPayload>,
}

/// A recorded task completion.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub proof_photos: Vec<String>,
}

impl From<TaskCompletion> for CompletionResponse {
    fn from(value: TaskCompletion) -> Self {
        Self {
            id: value.id,
            task_id: value.task_id,
            completed_at: value.completed_at,
            proof_photos: value.proof_photos.into_iter().map(String::from).collect(),
        }
    }
}

fn parse_create_request(payload: CreateTaskRequest) -> Result<CreateCustomTaskRequest, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error("name"))?;
    let assigned_to = payload
        .assigned_to
        .ok_or_else(|| missing_field_error("assignedTo"))?;
    Ok(CreateCustomTaskRequest {
        name: parse_task_name(&name, "name")?,
        assigned_to: parse_resident(&assigned_to, "assignedTo")?,
    })
}

fn parse_update_request(task_id: Uuid, payload: UpdateTaskBody) -> Result<UpdateTaskRequest, Error> {
    Ok(UpdateTaskRequest {
        task_id,
        name: payload
            .name
            .as_deref()
            .map(|name| parse_task_name(name, "name"))
            .transpose()?,
        assigned_to: payload
            .assigned_to
            .as_deref()
            .map(|resident| parse_resident(resident, "assignedTo"))
            .transpose()?,
    })
}

/// Every task across all rosters with its completion state.
#[utoipa::path(
    get,
    path = "/api/v1/admin/tasks",
    responses(
        (status = 200, description = "All tasks", body = [TaskResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listAllTasks"
)]
#[get("/admin/tasks")]
pub async fn list_all_tasks(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    session.require_admin()?;
    let tasks = state.chores_query.all_tasks().await?;
    Ok(web::Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Attach a custom task to the current week's roster.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskRecordResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let request = parse_create_request(payload.into_inner())?;
    let task = state.chores.create_custom_task(request).await?;
    info!(task_id = %task.id, created_by = %admin.name, "custom task added");
    Ok(HttpResponse::Created().json(TaskRecordResponse::from(task)))
}

/// Rename or reassign a task.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = UpdateTaskBody,
    responses(
        (status = 200, description = "Task updated", body = TaskRecordResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTaskBody>,
) -> ApiResult<web::Json<TaskRecordResponse>> {
    session.require_admin()?;
    let task_id = parse_uuid(&path.into_inner(), "id")?;
    let request = parse_update_request(task_id, payload.into_inner())?;
    let task = state.chores.update_task(request).await?;
    Ok(web::Json(task.into()))
}

/// Delete a task and its completion.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let task_id = parse_uuid(&path.into_inner(), "id")?;
    state.chores.delete_task(&task_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark a task done, optionally with photo proof.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{id}/complete",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = CompletionRequest,
    responses(
        (status = 201, description = "Completion recorded", body = CompletionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already completed", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "completeTask"
)]
#[post("/tasks/{id}/complete")]
pub async fn complete_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CompletionRequest>,
) -> ApiResult<HttpResponse> {
    session.require_principal()?;
    let task_id = parse_uuid(&path.into_inner(), "id")?;
    let photo = decode_photo(payload.into_inner().photo)?;
    let completion = state
        .chores
        .complete_task(CompleteTaskRequest { task_id, photo })
        .await?;
    Ok(HttpResponse::Created().json(CompletionResponse::from(completion)))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
