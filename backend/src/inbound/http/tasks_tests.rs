//! Tests for the task handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::TimeZone;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{PhotoName, Resident, Role, StandingTask, Task, TaskStatus, TaskView};
use crate::inbound::http::test_utils::{MockPorts, principal, sign_in, test_app};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_all_tasks)
        .service(create_task)
        .service(update_task)
        .service(delete_task)
        .service(complete_task);
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0)
        .single()
        .expect("instant")
}

fn custom_task(name: &str, assigned_to: Resident) -> Task {
    Task {
        id: Uuid::new_v4(),
        roster_id: Uuid::new_v4(),
        name: name.to_owned(),
        assigned_to,
        standing_kind: None,
        rotation_index: None,
        created_at: noon(),
    }
}

fn admin() -> crate::domain::Principal {
    principal(Resident::Perpetua, Role::Admin)
}

fn resident() -> crate::domain::Principal {
    principal(Resident::Atilla, Role::Resident)
}

#[actix_web::test]
async fn admin_creates_custom_task() {
    let mut ports = MockPorts::default();
    ports
        .chores
        .expect_create_custom_task()
        .withf(|request| request.name == "Water plants" && request.assigned_to == Resident::Illy)
        .times(1)
        .returning(|request| Ok(custom_task(&request.name, request.assigned_to)));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &admin()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/tasks")
        .cookie(cookie)
        .set_json(json!({ "name": "  Water plants ", "assignedTo": "illy" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["name"], "Water plants");
    assert_eq!(value["isCustomTask"], true);
    assert!(value["rotationIndex"].is_null());
}

#[rstest]
#[case(json!({ "assignedTo": "Illy" }), "name", "missing_field")]
#[case(json!({ "name": "   ", "assignedTo": "Illy" }), "name", "empty_name")]
#[case(json!({ "name": "Mop", "assignedTo": "Zed" }), "assignedTo", "unknown_resident")]
#[actix_web::test]
async fn create_task_validates_before_calling_the_service(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports.chores.expect_create_custom_task().times(0);
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &admin()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/tasks")
        .cookie(cookie)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[rstest]
#[case(actix_test::TestRequest::post().uri("/api/v1/tasks").set_json(json!({ "name": "x", "assignedTo": "Illy" })))]
#[case(actix_test::TestRequest::put().uri("/api/v1/tasks/00000000-0000-0000-0000-000000000001").set_json(json!({})))]
#[case(actix_test::TestRequest::delete().uri("/api/v1/tasks/00000000-0000-0000-0000-000000000001"))]
#[case(actix_test::TestRequest::get().uri("/api/v1/admin/tasks"))]
#[actix_web::test]
async fn task_management_is_admin_only(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let cookie = sign_in(&app, &resident()).await;

    let response = actix_test::call_service(&app, request.cookie(cookie).to_request()).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn update_task_passes_only_supplied_fields() {
    let task_id = Uuid::new_v4();
    let mut ports = MockPorts::default();
    ports
        .chores
        .expect_update_task()
        .withf(move |request| {
            request.task_id == task_id
                && request.name.is_none()
                && request.assigned_to == Some(Resident::Eman)
        })
        .times(1)
        .returning(|request| {
            let mut task = custom_task("Sweep/Vacuum & Mop Floors", Resident::Eman);
            task.id = request.task_id;
            task.standing_kind = Some(StandingTask::Sweeping);
            task.rotation_index = Some(2);
            Ok(task)
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &admin()).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/{task_id}"))
        .cookie(cookie)
        .set_json(json!({ "assignedTo": "Eman" }))
        .to_request();
    let value: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(value["standingKind"], "sweeping");
    assert_eq!(value["rotationIndex"], 2);
    assert_eq!(value["isCustomTask"], false);
}

#[actix_web::test]
async fn malformed_task_id_is_a_bad_request() {
    let mut ports = MockPorts::default();
    ports.chores.expect_delete_task().times(0);
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &admin()).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/tasks/not-a-uuid")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_unknown_task_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .chores
        .expect_delete_task()
        .returning(|id| Err(Error::not_found(format!("task {id} not found"))));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &admin()).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/{}", Uuid::new_v4()))
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn resident_completes_task_with_photo() {
    let task_id = Uuid::new_v4();
    let mut ports = MockPorts::default();
    ports
        .chores
        .expect_complete_task()
        .withf(move |request| {
            request.task_id == task_id
                && request
                    .photo
                    .as_ref()
                    .is_some_and(|photo| photo.original_name() == "bin.jpg" && photo.bytes() == [1, 2, 3])
        })
        .times(1)
        .returning(|request| {
            Ok(TaskCompletion {
                id: Uuid::new_v4(),
                task_id: request.task_id,
                completed_at: noon(),
                proof_photos: vec![PhotoName::new("1741780800000-bin.jpg").expect("photo")],
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &resident()).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{task_id}/complete"))
        .cookie(cookie)
        .set_json(json!({ "photo": { "fileName": "bin.jpg", "contentBase64": "AQID" } }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["taskId"], task_id.to_string());
    assert_eq!(value["proofPhotos"][0], "1741780800000-bin.jpg");
}

#[actix_web::test]
async fn completing_twice_is_a_conflict() {
    let mut ports = MockPorts::default();
    ports
        .chores
        .expect_complete_task()
        .withf(|request| request.photo.is_none())
        .returning(|request| {
            Err(Error::conflict(format!(
                "task {} is already completed",
                request.task_id
            )))
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &resident()).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{}/complete", Uuid::new_v4()))
        .cookie(cookie)
        .set_json(json!({}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "conflict");
}

#[actix_web::test]
async fn admin_task_listing_includes_status() {
    let mut ports = MockPorts::default();
    ports.chores_query.expect_all_tasks().returning(|| {
        let task = custom_task("Defrost freezer", Resident::Allegra);
        Ok(vec![TaskView {
            id: task.id,
            roster_id: task.roster_id,
            name: task.name,
            assigned_to: task.assigned_to,
            standing_kind: None,
            is_custom_task: true,
            rotation_index: None,
            status: TaskStatus::Pending,
            completed_at: None,
            proof_count: 0,
            proof_photos: Vec::new(),
        }])
    });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;
    let cookie = sign_in(&app, &admin()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/admin/tasks")
        .cookie(cookie)
        .to_request();
    let value: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(value[0]["status"], "pending");
    assert_eq!(value[0]["proofCount"], 0);
}
