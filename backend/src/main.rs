use actix_cors::Cors;
use actix_files::Files;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

mod config;
mod db;
mod handlers;
mod models;
mod services;

use config::Config;
use services::clock::{Clock, ZonedClock};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    log::info!("Starting server at {}:{}", config.host, config.port);
    log::info!("Serving static files from: {}", config.static_files_path);
    log::info!("Calendar dates follow {}", config.timezone);

    let pool = db::connect(&config.database_url).await.map_err(|e| {
        log::error!("Failed to open database {}: {}", config.database_url, e);
        std::io::Error::other(e)
    })?;

    db::init_schema(&pool).await.map_err(|e| {
        log::error!("Failed to initialize schema: {}", e);
        std::io::Error::other(e)
    })?;

    log::info!("Database ready");

    let clock: Arc<dyn Clock> = Arc::new(ZonedClock::new(config.timezone));
    let app_state = web::Data::new(models::AppState {
        db: pool.clone(),
        clock,
    });

    let static_files_path = config.static_files_path.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .send_wildcard()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(handlers::configure_routes)
            .service(Files::new("/", &static_files_path).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    pool.close().await;
    log::info!("Server stopped");

    Ok(())
}
