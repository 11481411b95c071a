// src/models/guestbook_entry.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validations::{validate_entry_message, validate_entry_name};

// DTO for creating a new guestbook entry
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateGuestbookEntryDto {
    #[validate(custom(function = validate_entry_name))]
    pub name: String,

    #[validate(custom(function = validate_entry_message))]
    pub message: String,
}

/// A single guestbook entry as stored in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GuestbookEntry {
    /// The unique ID of the entry
    pub id: Uuid,

    /// Display name of the person who signed the guestbook
    pub name: String,

    /// The message they left
    pub message: String,

    /// When the entry was created
    pub created_at: DateTime<Utc>,
}
