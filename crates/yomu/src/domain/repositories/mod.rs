pub mod chapter_pages;
pub mod progress;
pub mod selection;
pub mod session;
pub mod store;
