mod guestbook;
mod visitors;

pub use guestbook::{GuestbookService, GuestbookServiceTrait};
pub use visitors::VisitorService;
