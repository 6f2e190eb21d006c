use actix_web::{web, HttpResponse, Result};
use shared::{ApiError, RolloverRequest, RolloverResponse};

use super::method_not_allowed;
use crate::models::AppState;
use crate::services::clock::format_date;
use crate::services::rollover::{self as rollover_service, RolloverError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/rollover")
            .route(web::post().to(rollover))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/auto-rollover")
            .route(web::post().to(auto_rollover))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/rollover-all")
            .route(web::post().to(rollover_all))
            .default_service(web::to(method_not_allowed)),
    );
}

fn rollover_error_response(e: RolloverError) -> HttpResponse {
    match e {
        RolloverError::InvalidDate(_) => {
            HttpResponse::BadRequest().json(ApiError::new("invalid_date", e.to_string()))
        }
        RolloverError::Backwards { .. } => {
            HttpResponse::BadRequest().json(ApiError::new("invalid_range", e.to_string()))
        }
        RolloverError::DatabaseError(ref err) => {
            log::error!("Error rolling over tasks: {:?}", err);
            HttpResponse::InternalServerError().json(ApiError::new("internal_error", err.to_string()))
        }
    }
}

async fn rollover(
    state: web::Data<AppState>,
    body: web::Json<RolloverRequest>,
) -> Result<HttpResponse> {
    let from_date = body.from_date.trim();
    let to_date = body.to_date.trim();

    if from_date.is_empty() || to_date.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiError::new(
            "missing_dates",
            "Both from_date and to_date are required",
        )));
    }

    match rollover_service::rollover_tasks(&state.db, from_date, to_date).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(RolloverResponse {
            message: "Tasks rolled over successfully".to_string(),
            tasks_moved: outcome.tasks_moved,
            from_date: Some(outcome.from_date),
            to_date: outcome.to_date,
        })),
        Err(e) => Ok(rollover_error_response(e)),
    }
}

async fn auto_rollover(state: web::Data<AppState>) -> Result<HttpResponse> {
    match rollover_service::auto_rollover(&state.db, state.clock.as_ref()).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(RolloverResponse {
            message: "Auto rollover completed".to_string(),
            tasks_moved: outcome.tasks_moved,
            from_date: Some(outcome.from_date),
            to_date: outcome.to_date,
        })),
        Err(e) => Ok(rollover_error_response(e)),
    }
}

async fn rollover_all(state: web::Data<AppState>) -> Result<HttpResponse> {
    let to_date = format_date(state.clock.today());

    match rollover_service::rollover_all_pending_tasks(&state.db, &to_date).await {
        Ok(tasks_moved) => Ok(HttpResponse::Ok().json(RolloverResponse {
            message: "All pending tasks rolled over to today".to_string(),
            tasks_moved,
            from_date: None,
            to_date,
        })),
        Err(e) => Ok(rollover_error_response(e)),
    }
}
