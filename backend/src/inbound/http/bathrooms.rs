//! Bathroom duty handlers.
//!
//! ```text
//! PUT  /api/v1/bathrooms/{id} {"assignedTo":"Illy","cleaningMode":"basic"}
//! POST /api/v1/bathrooms/{id}/complete {"photo":{"fileName":"tub.png","contentBase64":"..."}}
//! ```

use actix_web::{post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{CompleteBathroomRequest, UpdateBathroomRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::roster::BathroomResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::CompletionRequest;
use crate::inbound::http::validation::{
    decode_photo, parse_cleaning_mode, parse_resident, parse_uuid,
};

/// Request body for `PUT /api/v1/bathrooms/{id}`; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBathroomBody {
    pub assigned_to: Option<String>,
    pub cleaning_mode: Option<String>,
}

fn parse_update_request(
    assignment_id: uuid::Uuid,
    payload: &UpdateBathroomBody,
) -> Result<UpdateBathroomRequest, Error> {
    Ok(UpdateBathroomRequest {
        assignment_id,
        assigned_to: payload
            .assigned_to
            .as_deref()
            .map(|resident| parse_resident(resident, "assignedTo"))
            .transpose()?,
        cleaning_mode: payload
            .cleaning_mode
            .as_deref()
            .map(|mode| parse_cleaning_mode(mode, "cleaningMode"))
            .transpose()?,
    })
}

/// Reassign a bathroom duty or change its cleaning mode.
#[utoipa::path(
    put,
    path = "/api/v1/bathrooms/{id}",
    params(("id" = String, Path, description = "Bathroom assignment identifier")),
    request_body = UpdateBathroomBody,
    responses(
        (status = 200, description = "Assignment updated", body = BathroomResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["bathrooms"],
    operation_id = "updateBathroom"
)]
#[put("/bathrooms/{id}")]
pub async fn update_bathroom(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateBathroomBody>,
) -> ApiResult<web::Json<BathroomResponse>> {
    session.require_principal()?;
    let assignment_id = parse_uuid(&path.into_inner(), "id")?;
    let request = parse_update_request(assignment_id, &payload)?;
    let assignment = state.chores.update_bathroom(request).await?;
    Ok(web::Json(assignment.into()))
}

/// Mark a bathroom duty done, optionally with photo proof.
#[utoipa::path(
    post,
    path = "/api/v1/bathrooms/{id}/complete",
    params(("id" = String, Path, description = "Bathroom assignment identifier")),
    request_body = CompletionRequest,
    responses(
        (status = 200, description = "Assignment completed", body = BathroomResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already completed", body = Error)
    ),
    tags = ["bathrooms"],
    operation_id = "completeBathroom"
)]
#[post("/bathrooms/{id}/complete")]
pub async fn complete_bathroom(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CompletionRequest>,
) -> ApiResult<web::Json<BathroomResponse>> {
    session.require_principal()?;
    let assignment_id = parse_uuid(&path.into_inner(), "id")?;
    let photo = decode_photo(payload.into_inner().photo)?;
    let assignment = state
        .chores
        .complete_bathroom(CompleteBathroomRequest {
            assignment_id,
            photo,
        })
        .await?;
    Ok(web::Json(assignment.into()))
}
