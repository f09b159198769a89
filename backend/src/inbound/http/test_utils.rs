//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, post, test as actix_test, web};
use uuid::Uuid;

use crate::domain::ports::{
    MockChoreCommand, MockChoreQuery, MockLoginService, MockRosterCommand, MockRosterQuery,
    MockUsersQuery,
};
use crate::domain::{Principal, Resident, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Mocks for every driving port; tests set expectations on the ones they use.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub users: MockUsersQuery,
    pub roster: MockRosterCommand,
    pub roster_query: MockRosterQuery,
    pub chores: MockChoreCommand,
    pub chores_query: MockChoreQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            users: Arc::new(self.users),
            roster: Arc::new(self.roster),
            roster_query: Arc::new(self.roster_query),
            chores: Arc::new(self.chores),
            chores_query: Arc::new(self.chores_query),
        }
    }
}

pub fn principal(name: Resident, role: Role) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        name,
        role,
    }
}

#[post("/test/sign-in")]
async fn sign_in_for_tests(
    session: SessionContext,
    payload: web::Json<Principal>,
) -> ApiResult<HttpResponse> {
    session.persist_principal(&payload.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// App serving `/api/v1` with `configure`'s handlers and a sign-in helper.
pub fn test_app<F>(
    state: HttpState,
    configure: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(sign_in_for_tests)
                .configure(configure),
        )
}

/// Establish a session for `principal` and return its cookie.
pub async fn sign_in(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    principal: &Principal,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/test/sign-in")
        .set_json(principal)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "sign-in helper failed");
    session_cookie(&response).expect("session cookie")
}
