use std::io::{self, Write};
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use pomodoro_planner::models::grid::{HourLabel, DAY_SHORT_LABELS};
use pomodoro_planner::models::plan::{DailyPlan, PlanId};
use pomodoro_planner::models::settings::AppSettings;
use pomodoro_planner::models::task::{TaskId, TaskState};
use pomodoro_planner::services::grid::{CalendarGridController, LoadOutcome};
use pomodoro_planner::services::plan_form::PlanFormController;
use pomodoro_planner::services::repository::{PlanRepository, RestPlanRepository};
use pomodoro_planner::services::session::StaticSession;
use pomodoro_planner::services::settings::{
    effective_api_url, SettingsService, SettingsSync, API_URL_ENV,
};
use pomodoro_planner::services::slots;

type Grid = CalendarGridController<RestPlanRepository, StaticSession>;

/// Options for `add`, as given on the command line
pub struct AddOptions {
    pub day: u8,
    pub hour: String,
    pub task: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub note: Option<String>,
}

/// Options for `edit`
pub struct EditOptions {
    pub plan_id: String,
    pub day: Option<u8>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub task: Option<String>,
    pub note: Option<String>,
}

/// Build the grid for the configured account and load its plans.
fn open_grid(settings: &AppSettings) -> Result<Grid> {
    let zone = settings
        .display_zone()
        .map_err(|e| anyhow!("Invalid timezone setting: {}", e))?;
    let repository = RestPlanRepository::new(effective_api_url(settings))?;
    let session = StaticSession::from_settings(settings);
    let mut grid = CalendarGridController::new(repository, session, zone);

    match grid.mount() {
        LoadOutcome::Loaded { plans } => {
            log::info!("Loaded {} plan(s)", plans);
            Ok(grid)
        }
        LoadOutcome::NoSession => {
            bail!("No user configured. Run `pomodoro-planner config set user_id <id>`.")
        }
        LoadOutcome::MissingConfig => bail!(
            "No API URL configured. Set {} or run `pomodoro-planner config set api_url <url>`.",
            API_URL_ENV
        ),
        LoadOutcome::Cancelled => bail!("Loading plans was cancelled"),
        LoadOutcome::Failed(message) => bail!("Could not load plans: {}", message),
    }
}

fn form(grid: &mut Grid) -> Result<&mut PlanFormController> {
    grid.form_mut().ok_or_else(|| anyhow!("The plan form did not open"))
}

/// Submit the open form, surfacing the alert the grid raised on failure.
fn submit(grid: &mut Grid) -> Result<()> {
    if let Err(err) = grid.submit_form() {
        let message = grid.take_alert().unwrap_or_else(|| err.to_string());
        bail!(message);
    }
    Ok(())
}

fn plan_card(grid: &Grid, plan: &DailyPlan) -> String {
    match plan.note.as_deref() {
        Some(note) => format!("{}\n{}", grid.plan_time_label(plan), note),
        None => grid.plan_time_label(plan),
    }
}

pub fn cmd_week(settings: &AppSettings) -> Result<()> {
    let grid = open_grid(settings)?;

    println!("Coins: {}", grid.coins());
    if grid.daily_plans().is_empty() {
        println!("No plans this week.");
    }

    let mut header = vec![Cell::new("").add_attribute(Attribute::Bold)];
    header.extend(
        DAY_SHORT_LABELS
            .iter()
            .map(|label| Cell::new(label).add_attribute(Attribute::Bold)),
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in grid.week_grid() {
        let mut cells = vec![Cell::new(row.hour).add_attribute(Attribute::Bold)];
        for plans in &row.cells {
            let text = plans
                .iter()
                .map(|plan| plan_card(&grid, plan))
                .collect::<Vec<_>>()
                .join("\n\n");
            cells.push(Cell::new(text).fg(Color::Cyan));
        }
        table.add_row(cells);
    }
    println!("{table}");

    let hidden = slots::hidden_plans(grid.daily_plans(), grid.zone());
    if !hidden.is_empty() {
        println!("{} plan(s) start outside 7:00-17:00 and are not shown.", hidden.len());
    }
    Ok(())
}

pub fn cmd_tasks(settings: &AppSettings) -> Result<()> {
    let grid = open_grid(settings)?;
    let user = grid
        .user()
        .ok_or_else(|| anyhow!("No user configured"))?;
    let tasks = grid
        .repository()
        .list_tasks(&user.id)
        .context("Failed to load tasks")?;

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("State").add_attribute(Attribute::Bold),
        ]);

    for task in tasks {
        let color = match task.state {
            TaskState::Completed => Color::Green,
            TaskState::InProgress => Color::Yellow,
            TaskState::Pending => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(&task.title),
            Cell::new(task.due_date.unwrap_or_default()),
            Cell::new(task.state).fg(color),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn cmd_add(settings: &AppSettings, options: AddOptions) -> Result<()> {
    let hour = HourLabel::parse(&options.hour)
        .filter(|hour| hour.is_on_grid())
        .ok_or_else(|| anyhow!("Hour '{}' is not a grid row (7:00-17:00)", options.hour))?;

    let mut grid = open_grid(settings)?;
    grid.select_cell(options.day, hour)?;

    let form = form(&mut grid)?;
    match options.task {
        Some(task_id) => {
            form.set_create_new_task(false);
            form.select_task(Some(TaskId::from(task_id.as_str())));
        }
        None => {
            form.set_task_title(options.title.unwrap_or_default());
            if let Some(description) = options.description {
                form.set_task_description(description);
            }
            if let Some(due) = options.due {
                form.set_due_date(due);
            }
        }
    }
    if let Some(start) = options.start {
        form.set_start_time(&start);
    }
    if let Some(end) = options.end {
        form.set_end_time(&end);
    }
    if let Some(note) = options.note {
        form.set_note(note);
    }
    let heading = form.heading();

    submit(&mut grid)?;
    println!("{}: saved ({} plan(s) this week)", heading, grid.daily_plans().len());
    Ok(())
}

pub fn cmd_edit(settings: &AppSettings, options: EditOptions) -> Result<()> {
    let mut grid = open_grid(settings)?;
    grid.edit_plan(&PlanId::from(options.plan_id.as_str()))?;

    let form = form(&mut grid)?;
    if let Some(day) = options.day {
        form.select_day(day)?;
    }
    if let Some(start) = options.start {
        form.set_start_time(&start);
    }
    if let Some(end) = options.end {
        form.set_end_time(&end);
    }
    if let Some(task_id) = options.task {
        form.select_task(Some(TaskId::from(task_id.as_str())));
    }
    if let Some(note) = options.note {
        form.set_note(note);
    }

    submit(&mut grid)?;
    println!("Plan {} updated.", options.plan_id);
    Ok(())
}

pub fn cmd_delete(settings: &AppSettings, plan_id: &str, yes: bool) -> Result<()> {
    let mut grid = open_grid(settings)?;
    let pending = grid.request_delete(&PlanId::from(plan_id))?.clone();

    if !yes {
        println!("{}", pending.title);
        print!("{} [y/N] ", pending.message);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;
        if input.trim().to_lowercase() != "y" {
            grid.cancel_delete();
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Err(err) = grid.confirm_delete() {
        let message = grid.take_alert().unwrap_or_else(|| err.to_string());
        bail!("{}: {}", message, err);
    }
    println!("Plan {} deleted.", plan_id);
    Ok(())
}

pub fn cmd_config_show(service: &SettingsService, settings: &AppSettings) -> Result<()> {
    println!("# {}", service.path().display());
    print!(
        "{}",
        toml::to_string_pretty(settings).context("Failed to serialize settings")?
    );
    if let Some(url) = effective_api_url(settings) {
        if settings.api_url.as_deref() != Some(url.as_str()) {
            println!("# api_url overridden by {}: {}", API_URL_ENV, url);
        }
    }
    Ok(())
}

pub fn cmd_config_set(
    service: &SettingsService,
    settings: &mut AppSettings,
    key: &str,
    value: &str,
) -> Result<()> {
    apply_setting(settings, key, value)?;

    let mut sync = SettingsSync::default();
    sync.record(settings.clone(), Instant::now());
    sync.flush(service)?;
    println!("{} updated.", key);
    Ok(())
}

/// Set one settings key from its command-line text.
pub fn apply_setting(settings: &mut AppSettings, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    let optional = || Some(value.to_string()).filter(|v| !v.is_empty());

    match key {
        "api_url" => settings.api_url = optional(),
        "user_id" => settings.user_id = optional(),
        "timezone" => settings.timezone = optional(),
        "music_enabled" => {
            settings.music_enabled = value
                .parse()
                .with_context(|| format!("music_enabled expects true or false, got '{}'", value))?
        }
        "muted" => {
            settings.muted = value
                .parse()
                .with_context(|| format!("muted expects true or false, got '{}'", value))?
        }
        "volume" => {
            settings.volume = value
                .parse()
                .with_context(|| format!("volume expects a number, got '{}'", value))?
        }
        other => bail!("Unknown setting '{}'", other),
    }

    settings
        .validate()
        .map_err(|e| anyhow!("Invalid value for {}: {}", key, e))
}
