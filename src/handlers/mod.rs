mod guestbook;
mod visitors;

pub use guestbook::{create_entry_handler, list_entries_handler, GuestbookServiceType};
pub use visitors::visitor_stats_handler;
