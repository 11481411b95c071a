mod guestbook_entry;
mod visitor;

pub use guestbook_entry::{CreateGuestbookEntryDto, GuestbookEntry};
pub use visitor::VisitorStats;
