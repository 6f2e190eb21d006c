use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use shared::{ApiError, CompleteTaskRequest, MessageResponse, TaskRequest, UpdateTaskCategoryRequest};

use super::{invalid_id, method_not_allowed};
use crate::models::AppState;
use crate::services::clock::format_date;
use crate::services::tasks::{self as task_service, TaskError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tasks")
            .route(web::get().to(list_tasks))
            .route(web::post().to(create_task))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/tasks/{task_id}/complete")
            .route(web::put().to(update_task_completion))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/tasks/{task_id}/category")
            .route(web::put().to(update_task_category))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/tasks/{task_id}")
            .route(web::get().to(get_task))
            .route(web::put().to(update_task))
            .route(web::delete().to(delete_task))
            .default_service(web::to(method_not_allowed)),
    );
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Resolve an optional `?date=` to a normalized date, defaulting to today.
pub(crate) fn resolve_date(state: &AppState, date: Option<&str>) -> Result<String, TaskError> {
    match date.map(str::trim) {
        Some(date) if !date.is_empty() => task_service::validate_date(date),
        _ => Ok(format_date(state.clock.today())),
    }
}

/// Map engine errors onto HTTP statuses.
pub(crate) fn task_error_response(e: TaskError, context: &str) -> HttpResponse {
    match e {
        TaskError::NotFound => {
            HttpResponse::NotFound().json(ApiError::new("not_found", "Task not found"))
        }
        TaskError::EmptyTitle => {
            HttpResponse::BadRequest().json(ApiError::new("invalid_title", e.to_string()))
        }
        TaskError::InvalidDate(_) => {
            HttpResponse::BadRequest().json(ApiError::new("invalid_date", e.to_string()))
        }
        TaskError::DatabaseError(ref err) => {
            log::error!("{}: {:?}", context, err);
            HttpResponse::InternalServerError().json(ApiError::new("internal_error", err.to_string()))
        }
    }
}

fn parse_task_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    let date = match resolve_date(&state, query.date.as_deref()) {
        Ok(date) => date,
        Err(e) => return Ok(task_error_response(e, "Error resolving date")),
    };

    match task_service::get_tasks_by_date(&state.db, &date).await {
        Ok(tasks) => Ok(HttpResponse::Ok().json(tasks)),
        Err(e) => Ok(task_error_response(e, "Error listing tasks")),
    }
}

async fn create_task(
    state: web::Data<AppState>,
    body: web::Json<TaskRequest>,
) -> Result<HttpResponse> {
    match task_service::create_task(&state.db, state.clock.as_ref(), &body).await {
        Ok(task) => {
            log::info!("Created task {} on {}", task.id, task.assigned_date);
            Ok(HttpResponse::Created().json(task))
        }
        Err(e) => Ok(task_error_response(e, "Error creating task")),
    }
}

async fn get_task(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let Some(task_id) = parse_task_id(&path) else {
        return Ok(invalid_id("task"));
    };

    match task_service::get_task(&state.db, task_id).await {
        Ok(Some(task)) => Ok(HttpResponse::Ok().json(task)),
        Ok(None) => Ok(task_error_response(TaskError::NotFound, "Error fetching task")),
        Err(e) => Ok(task_error_response(e, "Error fetching task")),
    }
}

async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<TaskRequest>,
) -> Result<HttpResponse> {
    let Some(task_id) = parse_task_id(&path) else {
        return Ok(invalid_id("task"));
    };

    match task_service::update_task(&state.db, task_id, &body).await {
        Ok(task) => Ok(HttpResponse::Ok().json(task)),
        Err(e) => Ok(task_error_response(e, "Error updating task")),
    }
}

async fn delete_task(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let Some(task_id) = parse_task_id(&path) else {
        return Ok(invalid_id("task"));
    };

    match task_service::delete_task(&state.db, task_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Task deleted successfully"))),
        Err(e) => Ok(task_error_response(e, "Error deleting task")),
    }
}

async fn update_task_completion(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CompleteTaskRequest>,
) -> Result<HttpResponse> {
    let Some(task_id) = parse_task_id(&path) else {
        return Ok(invalid_id("task"));
    };

    match task_service::update_task_completion(
        &state.db,
        state.clock.as_ref(),
        task_id,
        body.is_completed,
    )
    .await
    {
        Ok(task) => Ok(HttpResponse::Ok().json(task)),
        Err(e) => Ok(task_error_response(e, "Error updating task completion")),
    }
}

async fn update_task_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateTaskCategoryRequest>,
) -> Result<HttpResponse> {
    let Some(task_id) = parse_task_id(&path) else {
        return Ok(invalid_id("task"));
    };

    match task_service::update_task_category(&state.db, task_id, body.category_id).await {
        Ok(task) => Ok(HttpResponse::Ok().json(task)),
        Err(e) => Ok(task_error_response(e, "Error updating task category")),
    }
}
