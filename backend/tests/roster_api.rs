//! End-to-end coverage of the roster API over the in-memory adapters.
//!
//! The clock is driven by the test so week rollover can be exercised without
//! waiting for a real Monday.

use std::sync::Arc;

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

use chore_roster::Trace;
use chore_roster::domain::ports::RosterCommand;
use chore_roster::domain::{AccountLoginService, AccountSeeder, ChoreService, RosterService};
use chore_roster::inbound::http::auth::{current_user, list_users, login, logout};
use chore_roster::inbound::http::bathrooms::{complete_bathroom, update_bathroom};
use chore_roster::inbound::http::photos::get_photo;
use chore_roster::inbound::http::roster::{current_week, history as history_handler};
use chore_roster::inbound::http::state::HttpState;
use chore_roster::inbound::http::tasks::{
    complete_task, create_task, delete_task, list_all_tasks, update_task,
};
use chore_roster::outbound::memory::{InMemoryRosterRepository, InMemoryUserRepository};
use chore_roster::outbound::photos::FsPhotoStore;
use chore_roster::outbound::security::Argon2PasswordHasher;
use chore_roster::test_support::MutableClock;

const ADMIN_PASSWORD: &str = "house-admin";

struct Household {
    state: HttpState,
    clock: Arc<MutableClock>,
    _photos: TempDir,
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    // Wednesday 12 March 2025, ISO week 11.
    let now = Utc
        .with_ymd_and_hms(2025, 3, 12, 9, 0, 0)
        .single()
        .expect("valid instant");
    Arc::new(MutableClock::new(now))
}

async fn household(clock: Arc<MutableClock>) -> Household {
    let photos_dir = tempfile::tempdir().expect("temp dir");
    let photos = Arc::new(FsPhotoStore::open(photos_dir.path()).expect("photo store"));
    let roster_repo = Arc::new(InMemoryRosterRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let hasher = Arc::new(Argon2PasswordHasher);

    AccountSeeder::new(Arc::clone(&users), Arc::clone(&hasher))
        .seed_household()
        .await
        .expect("seed accounts");

    let roster = Arc::new(RosterService::new(Arc::clone(&roster_repo), clock.clone()));
    let roster_command: Arc<dyn RosterCommand> = roster.clone();
    let chores = Arc::new(ChoreService::new(
        roster_repo,
        roster_command.clone(),
        photos,
        clock.clone(),
    ));
    let accounts = Arc::new(
        AccountLoginService::new(users, hasher).with_admin_override(Some(ADMIN_PASSWORD.into())),
    );

    Household {
        state: HttpState {
            login: accounts.clone(),
            users: accounts,
            roster: roster_command,
            roster_query: roster,
            chores: chores.clone(),
            chores_query: chores,
        },
        clock,
        _photos: photos_dir,
    }
}

async fn app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(login)
                    .service(logout)
                    .service(current_user)
                    .service(list_users)
                    .service(current_week)
                    .service(history_handler)
                    .service(list_all_tasks)
                    .service(create_task)
                    .service(update_task)
                    .service(delete_task)
                    .service(complete_task)
                    .service(update_bathroom)
                    .service(complete_bathroom)
                    .service(get_photo),
            ),
    )
    .await
}

async fn log_in(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn get_json(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    uri: &str,
) -> Value {
    let request = actix_test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    actix_test::read_body_json(response).await
}

async fn post_json(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body_json(response).await;
    (status, body)
}

fn task_of_kind<'a>(roster: &'a Value, kind: &str) -> &'a Value {
    roster["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .find(|task| task["standingKind"] == kind)
        .expect("standing task present")
}

fn bathroom(roster: &Value, number: u64) -> &Value {
    roster["bathrooms"]
        .as_array()
        .expect("bathrooms array")
        .iter()
        .find(|bathroom| bathroom["bathroomNumber"] == number)
        .expect("bathroom present")
}

#[rstest]
#[actix_rt::test]
async fn first_week_starts_every_rotation_at_its_head(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let cookie = log_in(&app, "eman", "eman").await;

    let roster = get_json(&app, &cookie, "/api/v1/current-week").await;

    assert_eq!(roster["roster"]["weekStartDate"], "2025-03-10");
    assert_eq!(roster["roster"]["weekNumber"], 11);
    assert_eq!(task_of_kind(&roster, "trash")["assignedTo"], "Perpetua");
    assert_eq!(task_of_kind(&roster, "sweeping")["assignedTo"], "Atilla");
    assert_eq!(task_of_kind(&roster, "dusting")["assignedTo"], "Illy");
    assert_eq!(bathroom(&roster, 1)["assignedTo"], "Eman");
    assert_eq!(bathroom(&roster, 1)["cleaningMode"], "deep");
    assert_eq!(roster["tasks"].as_array().map(Vec::len), Some(3));
    assert_eq!(roster["bathrooms"].as_array().map(Vec::len), Some(3));
}

#[rstest]
#[actix_rt::test]
async fn next_week_advances_rotation_and_flips_cleaning_mode(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let cookie = log_in(&app, "dania", "dania").await;

    let first = get_json(&app, &cookie, "/api/v1/current-week").await;
    household.clock.advance(TimeDelta::days(7));
    let second = get_json(&app, &cookie, "/api/v1/current-week").await;

    assert_ne!(first["roster"]["id"], second["roster"]["id"]);
    assert_eq!(second["roster"]["weekStartDate"], "2025-03-17");
    assert_eq!(task_of_kind(&second, "trash")["assignedTo"], "Eman");
    assert_eq!(task_of_kind(&second, "sweeping")["assignedTo"], "Dania");
    assert_eq!(task_of_kind(&second, "dusting")["assignedTo"], "Allegra");
    assert_eq!(bathroom(&second, 1)["assignedTo"], "Allegra");
    assert_eq!(bathroom(&second, 1)["cleaningMode"], "basic");

    let history = get_json(&app, &cookie, "/api/v1/history").await;
    let weeks: Vec<&Value> = history
        .as_array()
        .expect("history array")
        .iter()
        .map(|entry| &entry["roster"]["weekStartDate"])
        .collect();
    assert_eq!(weeks, [&json!("2025-03-17"), &json!("2025-03-10")]);
}

#[rstest]
#[actix_rt::test]
async fn skipped_weeks_advance_the_rotation_one_step(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let cookie = log_in(&app, "eman", "eman").await;

    let first = get_json(&app, &cookie, "/api/v1/current-week").await;
    household.clock.advance(TimeDelta::days(7));
    let second = get_json(&app, &cookie, "/api/v1/current-week").await;
    household.clock.advance(TimeDelta::days(14));
    let after_gap = get_json(&app, &cookie, "/api/v1/current-week").await;

    assert_eq!(after_gap["roster"]["weekStartDate"], "2025-03-31");
    let trash: Vec<(Value, Value)> = [&first, &second, &after_gap]
        .into_iter()
        .map(|data| {
            let task = task_of_kind(data, "trash");
            (task["assignedTo"].clone(), task["rotationIndex"].clone())
        })
        .collect();
    assert_eq!(
        trash,
        [
            (json!("Perpetua"), json!(0)),
            (json!("Eman"), json!(1)),
            (json!("Allegra"), json!(2)),
        ]
    );
    assert_eq!(task_of_kind(&after_gap, "sweeping")["assignedTo"], "Illy");
    assert_eq!(bathroom(&after_gap, 1)["assignedTo"], "Eman");
    assert_eq!(bathroom(&after_gap, 1)["cleaningMode"], "deep");

    let history = get_json(&app, &cookie, "/api/v1/history").await;
    assert_eq!(history.as_array().map(Vec::len), Some(3));
}

#[rstest]
#[actix_rt::test]
async fn repeated_reads_within_a_week_reuse_the_roster(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let cookie = log_in(&app, "illy", "illy").await;

    let first = get_json(&app, &cookie, "/api/v1/current-week").await;
    household.clock.advance(TimeDelta::days(3));
    let second = get_json(&app, &cookie, "/api/v1/current-week").await;

    assert_eq!(first["roster"]["id"], second["roster"]["id"]);
    assert_eq!(
        get_json(&app, &cookie, "/api/v1/history")
            .await
            .as_array()
            .map(Vec::len),
        Some(1)
    );
}

#[rstest]
#[actix_rt::test]
async fn completing_a_task_with_a_photo_records_proof(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let cookie = log_in(&app, "perpetua", "perpetua").await;
    let roster = get_json(&app, &cookie, "/api/v1/current-week").await;
    let task_id = task_of_kind(&roster, "trash")["id"]
        .as_str()
        .expect("task id")
        .to_owned();

    let photo_bytes = b"\xFF\xD8\xFFproof".to_vec();
    let (status, completion) = post_json(
        &app,
        &cookie,
        &format!("/api/v1/tasks/{task_id}/complete"),
        json!({ "photo": { "fileName": "bins.jpg", "contentBase64": STANDARD.encode(&photo_bytes) } }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let photo_name = completion["proofPhotos"][0]
        .as_str()
        .expect("photo name")
        .to_owned();

    let (status, _) = post_json(
        &app,
        &cookie,
        &format!("/api/v1/tasks/{task_id}/complete"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let roster = get_json(&app, &cookie, "/api/v1/current-week").await;
    let task = task_of_kind(&roster, "trash");
    assert_eq!(task["status"], "completed");
    assert_eq!(task["proofCount"], 1);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/photos/{photo_name}"))
        .cookie(cookie.clone())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("image/jpeg")
    );
    let body = actix_test::read_body(response).await;
    assert_eq!(body.as_ref(), photo_bytes.as_slice());
}

#[rstest]
#[actix_rt::test]
async fn bathroom_completion_is_recorded_once(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let cookie = log_in(&app, "atilla", "atilla").await;
    let roster = get_json(&app, &cookie, "/api/v1/current-week").await;
    let bathroom_id = bathroom(&roster, 3)["id"]
        .as_str()
        .expect("bathroom id")
        .to_owned();
    let uri = format!("/api/v1/bathrooms/{bathroom_id}/complete");

    let (status, body) = post_json(&app, &cookie, &uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["completedAt"].is_string());

    let (status, _) = post_json(&app, &cookie, &uri, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[rstest]
#[actix_rt::test]
async fn custom_tasks_require_the_admin_claim(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;
    let body = json!({ "name": "Water the plants", "assignedTo": "Allegra" });

    let resident = log_in(&app, "allegra", "allegra").await;
    let (status, _) = post_json(&app, &resident, "/api/v1/tasks", body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = log_in(&app, "allegra", ADMIN_PASSWORD).await;
    let (status, created) = post_json(&app, &admin, "/api/v1/tasks", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["isCustomTask"], true);

    let tasks = get_json(&app, &admin, "/api/v1/admin/tasks").await;
    assert!(
        tasks
            .as_array()
            .expect("tasks array")
            .iter()
            .any(|task| task["name"] == "Water the plants")
    );

    // Custom tasks do not carry over into the next week.
    household.clock.advance(TimeDelta::days(7));
    let next = get_json(&app, &admin, "/api/v1/current-week").await;
    assert_eq!(next["tasks"].as_array().map(Vec::len), Some(3));
}

#[rstest]
#[actix_rt::test]
async fn requests_without_a_session_are_rejected(clock: Arc<MutableClock>) {
    let household = household(clock).await;
    let app = app(household.state.clone()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/current-week")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
