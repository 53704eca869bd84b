// Pomodoro Planner
// Main entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command, ConfigCommand};
use commands::*;
use pomodoro_planner::services::audio::{AudioSession, SilentPlayer, DEFAULT_TRACK};
use pomodoro_planner::services::settings::SettingsService;

fn main() {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Pomodoro Planner");

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let service = SettingsService::new(cli.config.unwrap_or_else(SettingsService::default_path));
    let mut settings = service.load()?;

    let mut audio = AudioSession::new(Box::new(SilentPlayer::default()), DEFAULT_TRACK);
    if let Err(e) = audio.apply_settings(&settings) {
        log::warn!("Background music unavailable: {}", e);
    }

    let result = match cli.command.unwrap_or(Command::Week) {
        Command::Week => cmd_week(&settings),
        Command::Tasks => cmd_tasks(&settings),
        Command::Add { day, hour, task, title, description, due, start, end, note } => cmd_add(
            &settings,
            AddOptions { day, hour, task, title, description, due, start, end, note },
        ),
        Command::Edit { plan_id, day, start, end, task, note } => cmd_edit(
            &settings,
            EditOptions { plan_id, day, start, end, task, note },
        ),
        Command::Delete { plan_id, yes } => cmd_delete(&settings, &plan_id, yes),
        Command::Config { command } => match command {
            ConfigCommand::Show => cmd_config_show(&service, &settings),
            ConfigCommand::Set { key, value } => {
                let result = cmd_config_set(&service, &mut settings, &key, &value);
                if result.is_ok() {
                    if let Err(e) = audio.apply_settings(&settings) {
                        log::warn!("Could not apply audio settings: {}", e);
                    }
                }
                result
            }
        },
    };

    audio.stop();
    log::info!("Pomodoro Planner finished");
    result
}
