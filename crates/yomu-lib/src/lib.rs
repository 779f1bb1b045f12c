pub mod error;
pub mod models;
pub mod traits;

/// Version of the shared models, reported by the client on startup
pub static LIB_VERSION: &str = env!("CARGO_PKG_VERSION");
