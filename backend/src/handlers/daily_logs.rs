use actix_web::{web, HttpResponse, Result};
use shared::ApiError;

use super::method_not_allowed;
use super::tasks::{resolve_date, task_error_response, DateQuery};
use crate::models::AppState;
use crate::services::daily_logs as log_service;
use crate::services::tasks::validate_date;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/daily-log")
            .route(web::get().to(get_daily_log))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/dates")
            .route(web::get().to(get_all_dates))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/history-summaries")
            .route(web::get().to(get_history_summaries))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/historical-log")
            .route(web::get().to(get_historical_log))
            .default_service(web::to(method_not_allowed)),
    );
}

async fn get_daily_log(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    let date = match resolve_date(&state, query.date.as_deref()) {
        Ok(date) => date,
        Err(e) => return Ok(task_error_response(e, "Error resolving date")),
    };

    match log_service::get_daily_log(&state.db, &date).await {
        Ok(log) => Ok(HttpResponse::Ok().json(log)),
        Err(e) => Ok(task_error_response(e, "Error building daily log")),
    }
}

async fn get_all_dates(state: web::Data<AppState>) -> Result<HttpResponse> {
    match log_service::get_all_dates(&state.db).await {
        Ok(dates) => Ok(HttpResponse::Ok().json(dates)),
        Err(e) => Ok(task_error_response(e, "Error listing dates")),
    }
}

async fn get_history_summaries(state: web::Data<AppState>) -> Result<HttpResponse> {
    match log_service::get_history_summaries(&state.db).await {
        Ok(summaries) => Ok(HttpResponse::Ok().json(summaries)),
        Err(e) => Ok(task_error_response(e, "Error building history summaries")),
    }
}

async fn get_historical_log(
    state: web::Data<AppState>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    // Unlike the daily log there is no default date here
    let date = match query.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => match validate_date(date) {
            Ok(date) => date,
            Err(e) => return Ok(task_error_response(e, "Error resolving date")),
        },
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiError::new(
                "missing_date",
                "Date is required",
            )));
        }
    };

    match log_service::get_historical_log(&state.db, &date).await {
        Ok(log) => Ok(HttpResponse::Ok().json(log)),
        Err(e) => Ok(task_error_response(e, "Error building historical log")),
    }
}
