mod guestbook;

pub use guestbook::{GuestbookRepository, GuestbookRepositoryTrait};
