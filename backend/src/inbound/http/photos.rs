//! Proof photo download.
//!
//! ```text
//! GET /api/v1/photos/{name}
//! ```

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, PhotoName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrorCode, field_error};

// Stored names are generated once and never overwritten.
const PHOTO_CACHE_CONTROL: &str = "private, max-age=31536000, immutable";

/// Serve a stored proof photo.
#[utoipa::path(
    get,
    path = "/api/v1/photos/{name}",
    params(("name" = String, Path, description = "Stored photo name")),
    responses(
        (status = 200, description = "Photo bytes", content_type = "image/jpeg"),
        (status = 400, description = "Invalid photo name", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["photos"],
    operation_id = "getPhoto"
)]
#[get("/photos/{name}")]
pub async fn get_photo(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_principal()?;
    let name = PhotoName::new(path.into_inner())
        .map_err(|err| field_error("name", FieldErrorCode::InvalidPhoto, err.to_string()))?;
    let photo = state.chores_query.photo(&name).await?;
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, photo.content_type))
        .insert_header((CACHE_CONTROL, PHOTO_CACHE_CONTROL))
        .body(photo.bytes))
}
