//! Tests for the authentication handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::web;
use mockall::predicate::always;
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

use super::*;
use crate::domain::{Resident, Role};
use crate::inbound::http::test_utils::{MockPorts, principal, session_cookie, sign_in, test_app};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(current_user)
        .service(list_users);
}

fn login_request(username: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: username.into(),
            password: password.into(),
        })
        .to_request()
}

#[rstest]
#[case("   ", "illy", "username", "empty_username")]
#[case("illy", "", "password", "empty_password")]
#[actix_web::test]
async fn login_rejects_blank_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports.login.expect_authenticate().times(0);
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let response = actix_test::call_service(&app, login_request(username, password)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[actix_web::test]
async fn login_returns_principal_and_session_cookie() {
    let mut ports = MockPorts::default();
    let user_id = Uuid::new_v4();
    ports
        .login
        .expect_authenticate()
        .withf(|creds| creds.username() == "illy" && creds.password() == "illy")
        .times(1)
        .returning(move |_| {
            Ok(Principal {
                user_id,
                name: Resident::Illy,
                role: Role::Resident,
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let response = actix_test::call_service(&app, login_request(" Illy ", "illy")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie");
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["userId"], user_id.to_string());
    assert_eq!(value["name"], "Illy");
    assert_eq!(value["role"], "resident");

    let who = actix_test::TestRequest::get()
        .uri("/api/v1/user")
        .cookie(cookie)
        .to_request();
    let who: Value = actix_test::call_and_read_body_json(&app, who).await;
    assert_eq!(who["name"], "Illy");
}

#[actix_web::test]
async fn login_propagates_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .with(always())
        .returning(|_| Err(Error::unauthorized("invalid credentials")));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let response = actix_test::call_service(&app, login_request("illy", "nope")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
}

#[actix_web::test]
async fn current_user_requires_a_session() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let request = actix_test::TestRequest::get().uri("/api/v1/user").to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let cookie = sign_in(&app, &principal(Resident::Eman, Role::Resident)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/logout")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let removal = session_cookie(&response).expect("removal cookie");
    assert_eq!(removal.value(), "");
}

#[rstest]
#[case(Role::Resident, StatusCode::FORBIDDEN)]
#[case(Role::Admin, StatusCode::OK)]
#[actix_web::test]
async fn list_users_requires_admin(#[case] role: Role, #[case] expected: StatusCode) {
    let mut ports = MockPorts::default();
    ports.users.expect_list_users().returning(|| {
        Ok(vec![AccountSummary {
            id: Uuid::nil(),
            username: "allegra".to_owned(),
            name: Resident::Allegra,
            role: Role::Resident,
        }])
    });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &principal(Resident::Allegra, role)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), expected);
    if expected == StatusCode::OK {
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value[0]["username"], "allegra");
        assert_eq!(value[0]["name"], "Allegra");
    }
}
