use actix_web::web;

use crate::handlers::{create_entry_handler, list_entries_handler};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/guestbook")
            .route("", web::get().to(list_entries_handler))
            .route("", web::post().to(create_entry_handler)),
    );
}
