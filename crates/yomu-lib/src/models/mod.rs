pub mod token;
pub use token::*;

pub mod manga_info;
pub use manga_info::*;

pub mod chapter_info;
pub use chapter_info::*;

pub mod query;
pub use query::*;
