use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    models::CreateGuestbookEntryDto,
    repositories::GuestbookRepository,
    services::{GuestbookService, GuestbookServiceTrait},
    types::Result,
};

pub type GuestbookServiceType = GuestbookService<GuestbookRepository>;

/// List the ten most recent guestbook entries, newest first
pub async fn list_entries_handler(
    service: web::Data<GuestbookServiceType>,
) -> Result<impl Responder> {
    let entries = service.get_recent().await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": entries,
        "message": "Successfully retrieved entries",
    })))
}

/// Append a new guestbook entry
pub async fn create_entry_handler(
    dto: web::Json<CreateGuestbookEntryDto>,
    service: web::Data<GuestbookServiceType>,
) -> Result<impl Responder> {
    let entry = service.create(dto.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "data": entry,
        "message": "Successfully created entry",
    })))
}
