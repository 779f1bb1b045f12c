#[macro_use]
extern crate log;

pub mod application;
pub mod context;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub mod test_utils;
