use actix_web::web;

use crate::handlers::visitor_stats_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/visitors").route("", web::get().to(visitor_stats_handler)),
    );
}
