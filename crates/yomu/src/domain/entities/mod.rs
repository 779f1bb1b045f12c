pub mod progress;
pub mod selection;
