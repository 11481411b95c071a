mod guestbook;

pub use guestbook::{validate_entry_message, validate_entry_name};
