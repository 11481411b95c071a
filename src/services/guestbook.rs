// src/services/guestbook.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{CreateGuestbookEntryDto, GuestbookEntry};
use crate::repositories::GuestbookRepositoryTrait;

type Result<T> = std::result::Result<T, AppError>;

/// How many entries the public listing returns
const RECENT_ENTRIES_LIMIT: i64 = 10;

#[async_trait]
pub trait GuestbookServiceTrait {
    async fn create(&self, dto: CreateGuestbookEntryDto) -> Result<GuestbookEntry>;
    async fn get_recent(&self) -> Result<Vec<GuestbookEntry>>;
}

pub struct GuestbookService<T: GuestbookRepositoryTrait> {
    repository: Arc<T>,
}

impl<T: GuestbookRepositoryTrait> GuestbookService<T> {
    pub fn new(repository: Arc<T>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<T: GuestbookRepositoryTrait + Send + Sync> GuestbookServiceTrait for GuestbookService<T> {
    async fn create(&self, dto: CreateGuestbookEntryDto) -> Result<GuestbookEntry> {
        dto.validate()?;

        let record = self.repository.save(&dto.name, &dto.message).await?;
        Ok(record)
    }

    async fn get_recent(&self) -> Result<Vec<GuestbookEntry>> {
        let entries = self.repository.find_recent(RECENT_ENTRIES_LIMIT).await?;
        Ok(entries)
    }
}
