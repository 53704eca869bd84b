// Module exports for models

pub mod cat;
pub mod grid;
pub mod plan;
pub mod settings;
pub mod task;
pub mod user;
