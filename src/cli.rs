use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pomodoro-planner", version, about = "Weekly pomodoro plan grid")]
pub struct Cli {
    /// Settings file to use instead of the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show this week's plans on the 7:00-17:00 grid
    Week,
    /// List the tasks plans can be attached to
    Tasks,
    /// Add a plan to a grid cell
    Add {
        /// Day of the week, 0 = Monday .. 6 = Sunday
        #[arg(long)]
        day: u8,
        /// Grid row, e.g. 9:00
        #[arg(long, default_value = "9:00")]
        hour: String,
        /// Attach to an existing task id instead of creating one
        #[arg(long, conflicts_with_all = ["title", "description", "due"])]
        task: Option<String>,
        /// Title of the task created with the plan
        #[arg(long)]
        title: Option<String>,
        /// Description of the task created with the plan
        #[arg(long)]
        description: Option<String>,
        /// Task due date in YYYY-MM-DD (defaults to today)
        #[arg(long)]
        due: Option<String>,
        /// Start time HH:MM (defaults to the cell's hour)
        #[arg(long)]
        start: Option<String>,
        /// End time HH:MM (defaults to one hour after the start)
        #[arg(long)]
        end: Option<String>,
        /// Note shown on the plan
        #[arg(long)]
        note: Option<String>,
    },
    /// Edit an existing plan
    Edit {
        /// Plan id
        plan_id: String,
        /// Move to another day, 0 = Monday .. 6 = Sunday
        #[arg(long)]
        day: Option<u8>,
        /// New start time HH:MM
        #[arg(long)]
        start: Option<String>,
        /// New end time HH:MM
        #[arg(long)]
        end: Option<String>,
        /// Attach to another task id
        #[arg(long)]
        task: Option<String>,
        /// Replace the note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a plan
    Delete {
        /// Plan id
        plan_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change local settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Change one setting; an empty value clears optional keys
    Set {
        /// api_url, user_id, timezone, music_enabled, volume or muted
        key: String,
        value: String,
    },
}
