//! Integration tests for the HTTP surface, run against the in-memory
//! SQLite variant so no external database is needed.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};

use tasklist_be::app_state::AppState;
use tasklist_be::config::{Config, DbEngine};
use tasklist_be::store::SqliteTaskStore;
use tasklist_be::task;

fn test_config() -> Config {
    Config {
        engine: DbEngine::Sqlite,
        db_host: "localhost".to_string(),
        db_port: 5432,
        db_user: "postgres".to_string(),
        db_password: "postgres".to_string(),
        db_name: "todolist".to_string(),
        sqlite_path: ":memory:".to_string(),
        frontend_origin: "http://localhost:5173".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

async fn test_app() -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let store = SqliteTaskStore::new(":memory:").await.unwrap();
    store.migrate().await.unwrap();
    test::init_service(
        App::new()
            .app_data(web::Data::new(AppState {
                store: Arc::new(store),
                config: test_config(),
            }))
            .configure(task::api_routes),
    )
    .await
}

#[actix_web::test]
async fn api_index_greets() {
    let app = test_app().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("Bienvenue"));
}

#[actix_web::test]
async fn create_applies_documented_defaults() {
    let app = test_app().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({ "text": "Buy milk" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "id": 1,
            "text": "Buy milk",
            "details": "",
            "completed": false,
            "priority": "Low",
            "category": "Général",
            "dueDate": "",
            "subtasks": [],
            "timeEstimate": 0,
            "isArchived": false,
            "recurrence": null
        })
    );
}

#[actix_web::test]
async fn create_ignores_completed_and_archived_in_payload() {
    let app = test_app().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({
                "text": "Sneaky",
                "completed": true,
                "isArchived": true,
                "priority": "Urgent"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["completed"], json!(false));
    assert_eq!(body["isArchived"], json!(false));
    assert_eq!(body["priority"], json!("Urgent"));
}

#[actix_web::test]
async fn create_keeps_provided_fields_and_subtasks() {
    let app = test_app().await;

    let subtasks = json!([
        { "id": 1717171717000i64, "text": "step one", "completed": false },
        { "id": 1717171717001i64, "text": "step two", "completed": true }
    ]);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({
                "text": "Plan trip",
                "details": "with the kids",
                "priority": "High",
                "category": "Famille",
                "dueDate": "2026-09-15",
                "subtasks": subtasks,
                "timeEstimate": 90,
                "recurrence": "weekly"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"], json!("with the kids"));
    assert_eq!(body["category"], json!("Famille"));
    assert_eq!(body["dueDate"], json!("2026-09-15"));
    assert_eq!(body["subtasks"], subtasks);
    assert_eq!(body["timeEstimate"], json!(90));
    assert_eq!(body["recurrence"], json!("weekly"));
}

#[actix_web::test]
async fn update_merges_only_provided_fields() {
    let app = test_app().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({ "text": "Buy milk" }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(resp).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/tasks/1")
            .set_json(json!({ "completed": true }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let updated: Value = test::read_body_json(resp).await;
    let mut expected = created.clone();
    expected["completed"] = json!(true);
    assert_eq!(updated, expected);
}

#[actix_web::test]
async fn update_overwrites_exactly_the_provided_fields() {
    let app = test_app().await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({ "text": "Old text", "priority": "High", "timeEstimate": 30 }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/tasks/1")
            .set_json(json!({
                "text": "New text",
                "isArchived": true,
                "subtasks": [{ "id": 42, "text": "only one", "completed": false }]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["text"], json!("New text"));
    assert_eq!(body["isArchived"], json!(true));
    assert_eq!(body["subtasks"][0]["text"], json!("only one"));
    // untouched fields keep their stored values
    assert_eq!(body["priority"], json!("High"));
    assert_eq!(body["timeEstimate"], json!(30));
    assert_eq!(body["completed"], json!(false));
}

#[actix_web::test]
async fn update_unknown_id_returns_404() {
    let app = test_app().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/tasks/999")
            .set_json(json!({ "completed": true }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Task not found" }));
}

#[actix_web::test]
async fn delete_is_idempotent() {
    let app = test_app().await;

    // deleting an id that never existed is still a 204
    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/tasks/999").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 204);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({ "text": "Ephemeral" }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/tasks/1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 204);

    // a second delete of the same id is also a 204
    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/tasks/1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 204);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/tasks").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn list_orders_by_ascending_id() {
    let app = test_app().await;

    for text in ["first", "second", "third"] {
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/tasks")
                .set_json(json!({ "text": text }))
                .to_request(),
        )
        .await;
    }

    // touching a middle row must not change list order
    test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/tasks/2")
            .set_json(json!({ "completed": true }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/tasks").to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(body[1]["completed"], json!(true));
}
