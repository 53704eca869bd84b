// Pomodoro Planner Library
// Exports all modules for the CLI, tests and benches

pub mod models;
pub mod services;
pub mod utils;
