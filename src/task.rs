// src/task.rs

use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;

use crate::app_state::AppState;
use crate::models::{CreateTaskRequest, NewTask, UpdateTaskRequest};

/// Greeting on GET /api, kept so the client's reachability probe has
/// something to hit.
pub async fn api_index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Bienvenue sur le backend Rust 🦀" }))
}

/// LIST all tasks, ascending id. No pagination, no server-side filtering;
/// the client does all of that locally.
pub async fn list_tasks(data: web::Data<AppState>) -> impl Responder {
    match data.store.list().await {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => {
            error!("Error fetching tasks: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// CREATE a new task from a partial payload. Defaults are filled in for
/// every omitted field; see `NewTask`.
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> impl Responder {
    let new_task = NewTask::from(payload.into_inner());
    match data.store.create(new_task).await {
        Ok(task) => {
            info!("Task created: {}", task.id);
            HttpResponse::Created().json(task)
        }
        Err(e) => {
            error!("Error inserting task: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// UPDATE an existing task. Absent fields keep their stored value.
pub async fn update_task(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    let id = path.into_inner();
    match data.store.update(id, payload.into_inner()).await {
        Ok(Some(task)) => HttpResponse::Ok().json(task),
        Ok(None) => HttpResponse::NotFound().json(json!({ "message": "Task not found" })),
        Err(e) => {
            error!("Error updating task {}: {}", id, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// DELETE a task. Deleting an id that does not exist is still a 204, the
/// caller only cares that the row is gone.
pub async fn delete_task(data: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let id = path.into_inner();
    match data.store.delete(id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            error!("Error deleting task {}: {}", id, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// Route table shared between main() and the integration tests.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("", web::get().to(api_index))
            .service(
                web::scope("/tasks")
                    .route("", web::get().to(list_tasks))
                    .route("", web::post().to(create_task))
                    .route("/{task_id}", web::put().to(update_task))
                    .route("/{task_id}", web::delete().to(delete_task)),
            ),
    );
}
