use actix_web::{web, HttpResponse, Responder};

mod guestbook;
mod visitors;

use crate::types::{AppState, HealthStatus, ResponsePayload};

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("Welcome to the guestbook!"),
    };

    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let uptime = data.start_time.elapsed().as_secs();
    let db_health = data.db.health_check().await;

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        db_health: Some(db_health),
        uptime_seconds: uptime,
    };

    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));

    guestbook::configure(cfg);
    visitors::configure(cfg);
}
