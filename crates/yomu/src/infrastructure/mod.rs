pub mod config;
pub mod database;
pub mod repositories;
pub mod store;
