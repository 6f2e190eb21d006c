use actix_web::{web, HttpResponse, Result};
use shared::{ApiError, CreateCategoryRequest, MessageResponse, UpdateCategoryRequest};

use super::tasks::task_error_response;
use super::{invalid_id, method_not_allowed};
use crate::models::AppState;
use crate::services::categories::{self as category_service, CategoryError};
use crate::services::tasks as task_service;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/categories")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/categories/{category_id}/tasks")
            .route(web::get().to(list_category_tasks))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/categories/{category_id}")
            .route(web::get().to(get_category))
            .route(web::put().to(update_category))
            .route(web::delete().to(delete_category))
            .default_service(web::to(method_not_allowed)),
    );
}

fn category_error_response(e: CategoryError, context: &str) -> HttpResponse {
    match e {
        CategoryError::NotFound => {
            HttpResponse::NotFound().json(ApiError::new("not_found", e.to_string()))
        }
        CategoryError::EmptyName => {
            HttpResponse::BadRequest().json(ApiError::new("invalid_name", e.to_string()))
        }
        CategoryError::DuplicateName => {
            HttpResponse::Conflict().json(ApiError::new("duplicate_name", e.to_string()))
        }
        CategoryError::DatabaseError(ref err) => {
            log::error!("{}: {:?}", context, err);
            HttpResponse::InternalServerError().json(ApiError::new("internal_error", err.to_string()))
        }
    }
}

fn parse_category_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse> {
    match category_service::list_categories(&state.db).await {
        Ok(categories) => Ok(HttpResponse::Ok().json(categories)),
        Err(e) => Ok(category_error_response(e, "Error listing categories")),
    }
}

async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    match category_service::create_category(&state.db, &body).await {
        Ok(category) => {
            log::info!("Created category {} ({})", category.id, category.name);
            Ok(HttpResponse::Created().json(category))
        }
        Err(e) => Ok(category_error_response(e, "Error creating category")),
    }
}

async fn get_category(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let Some(category_id) = parse_category_id(&path) else {
        return Ok(invalid_id("category"));
    };

    match category_service::get_category(&state.db, category_id).await {
        Ok(Some(category)) => Ok(HttpResponse::Ok().json(category)),
        Ok(None) => Ok(category_error_response(CategoryError::NotFound, "Error fetching category")),
        Err(e) => Ok(category_error_response(e, "Error fetching category")),
    }
}

async fn update_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse> {
    let Some(category_id) = parse_category_id(&path) else {
        return Ok(invalid_id("category"));
    };

    match category_service::update_category(&state.db, category_id, &body).await {
        Ok(category) => Ok(HttpResponse::Ok().json(category)),
        Err(e) => Ok(category_error_response(e, "Error updating category")),
    }
}

async fn delete_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let Some(category_id) = parse_category_id(&path) else {
        return Ok(invalid_id("category"));
    };

    match category_service::delete_category(&state.db, category_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted successfully"))),
        Err(e) => Ok(category_error_response(e, "Error deleting category")),
    }
}

async fn list_category_tasks(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let Some(category_id) = parse_category_id(&path) else {
        return Ok(invalid_id("category"));
    };

    match task_service::get_tasks_by_category(&state.db, category_id).await {
        Ok(tasks) => Ok(HttpResponse::Ok().json(tasks)),
        Err(e) => Ok(task_error_response(e, "Error listing category tasks")),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{configure_routes, test_support::test_state};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use shared::{ApiError, Category, Task};

    #[actix_web::test]
    async fn test_default_categories_listed_by_name() {
        let (state, _clock) = test_state("2025-03-10").await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let categories: Vec<Category> = test::call_and_read_body_json(&app, req).await;

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Misc", "Personal", "Work"]);
        assert!(categories.iter().all(|c| c.task_count == 0));
    }

    #[actix_web::test]
    async fn test_create_category_and_conflicts() {
        let (state, _clock) = test_state("2025-03-10").await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({"name": "Errands"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Category = test::read_body_json(resp).await;
        assert_eq!(created.color, "#58a6ff");

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({"name": "Errands", "color": "#000000"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({"name": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiError = test::read_body_json(resp).await;
        assert_eq!(body.message, "Category name is required");
    }

    #[actix_web::test]
    async fn test_update_category_partially() {
        let (state, _clock) = test_state("2025-03-10").await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::put()
            .uri("/api/categories/1")
            .set_json(json!({"color": "#123456"}))
            .to_request();
        let updated: Category = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.name, "Work");
        assert_eq!(updated.color, "#123456");

        let req = test::TestRequest::put()
            .uri("/api/categories/1")
            .set_json(json!({"name": "Personal"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::put()
            .uri("/api/categories/999")
            .set_json(json!({"name": "Ghost"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_category_detaches_tasks() {
        let (state, _clock) = test_state("2025-03-10").await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({"title": "filed"}))
            .to_request();
        let task: Task = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/{}/category", task.id))
            .set_json(json!({"category_id": 2}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/categories/2/tasks").to_request();
        let filed: Vec<Task> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(filed.len(), 1);
        assert_eq!(filed[0].id, task.id);

        let req = test::TestRequest::get().uri("/api/categories/2").to_request();
        let category: Category = test::call_and_read_body_json(&app, req).await;
        assert_eq!(category.task_count, 1);

        let req = test::TestRequest::delete().uri("/api/categories/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/tasks/{}", task.id))
            .to_request();
        let task: Task = test::call_and_read_body_json(&app, req).await;
        assert_eq!(task.category_id, None);
        assert!(task.category.is_none());

        let req = test::TestRequest::delete().uri("/api/categories/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_category_id_must_be_numeric() {
        let (state, _clock) = test_state("2025-03-10").await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/categories/work").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
