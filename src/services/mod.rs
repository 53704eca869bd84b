// Service module exports

pub mod audio;
pub mod cancellation;
pub mod error;
pub mod grid;
pub mod plan_form;
pub mod repository;
pub mod session;
pub mod settings;
pub mod slots;
