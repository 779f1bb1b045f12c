pub mod chapter_cache;
pub mod session;
