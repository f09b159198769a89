//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every roster endpoint, the response schemas they
//! return and the session cookie security scheme. The document backs Swagger
//! UI in debug builds and is exported by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::AccountSummary;
use crate::domain::{
    CleaningMode, Error, ErrorCode, Principal, Resident, Role, StandingTask, TaskStatus,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::bathrooms::UpdateBathroomBody;
use crate::inbound::http::roster::{
    BathroomResponse, RosterDataResponse, TaskRecordResponse, TaskResponse, WeeklyRosterResponse,
};
use crate::inbound::http::tasks::{
    CompletionRequest, CompletionResponse, CreateTaskRequest, UpdateTaskBody,
};
use crate::inbound::http::validation::PhotoPayload;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the roster API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Chore roster API",
        description = "Weekly household chore rotation, completions and photo proof."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::auth::list_users,
        crate::inbound::http::roster::current_week,
        crate::inbound::http::roster::history,
        crate::inbound::http::tasks::list_all_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::complete_task,
        crate::inbound::http::bathrooms::update_bathroom,
        crate::inbound::http::bathrooms::complete_bathroom,
        crate::inbound::http::photos::get_photo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Principal,
        Role,
        Resident,
        StandingTask,
        CleaningMode,
        TaskStatus,
        AccountSummary,
        LoginRequest,
        WeeklyRosterResponse,
        TaskResponse,
        TaskRecordResponse,
        BathroomResponse,
        RosterDataResponse,
        CreateTaskRequest,
        UpdateTaskBody,
        CompletionRequest,
        CompletionResponse,
        UpdateBathroomBody,
        PhotoPayload,
    )),
    tags(
        (name = "auth", description = "Sign-in and accounts"),
        (name = "roster", description = "Weekly rosters and history"),
        (name = "tasks", description = "Standing and custom tasks"),
        (name = "bathrooms", description = "Bathroom duties"),
        (name = "photos", description = "Proof photos"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(object))) => object.properties.keys().cloned().collect(),
            other => panic!("expected object schema for {name}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/current-week")]
    #[case("/api/v1/history")]
    #[case("/api/v1/tasks/{id}/complete")]
    #[case("/api/v1/bathrooms/{id}/complete")]
    #[case("/api/v1/photos/{name}")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn task_schema_uses_camel_case() {
        let fields = schema_fields("TaskResponse");
        assert!(fields.iter().any(|field| field == "isCustomTask"));
        assert!(fields.iter().any(|field| field == "proofCount"));
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
