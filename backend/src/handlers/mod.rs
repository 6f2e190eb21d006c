use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use shared::ApiError;

pub mod categories;
pub mod daily_logs;
pub mod rollover;
pub mod tasks;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .configure(tasks::configure)
                .configure(daily_logs::configure)
                .configure(rollover::configure)
                .configure(categories::configure),
        );
}

/// Malformed or mistyped JSON bodies become a 400 with an `ApiError` body.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(ApiError::new(
        "invalid_body",
        "Invalid request body",
    ));
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Fallback for a matched path whose verb has no route.
async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ApiError::new("method_not_allowed", "Method not allowed"))
}

fn invalid_id(what: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new("invalid_id", format!("Invalid {} ID", what)))
}
