//! Create/edit form for a single daily plan.
//!
//! The form opens in create mode for a grid cell or in edit mode for an
//! existing plan. Submitting goes through [`PlanFormController::begin_submit`]
//! (validation plus the reentrancy guard), [`execute`] (the requests) and
//! [`PlanFormController::finish_submit`]; [`PlanFormController::submit`] runs
//! all three in order.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::grid::{is_valid_day, long_day_label, GridCell};
use crate::models::plan::{DailyPlan, PlanId, PlanPayload};
use crate::models::task::{NewTask, Task, TaskId};
use crate::models::user::UserId;
use crate::services::cancellation::CancellationToken;
use crate::services::error::PlannerError;
use crate::services::repository::PlanRepository;
use crate::utils::date::{format_clock, parse_clock, parse_date, DisplayZone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PlanId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

/// Plan fields being edited. Dates are fixed when the form opens; only the
/// `HH:MM` clocks are editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFormData {
    pub day: u8,
    pub start_date: NaiveDate,
    pub start_clock: String,
    pub end_date: NaiveDate,
    pub end_clock: String,
    pub note: String,
    pub task_id: Option<TaskId>,
}

impl PlanFormData {
    /// Start as a minute-precision `YYYY-MM-DDTHH:MM` string
    pub fn start_value(&self) -> String {
        format!("{}T{}", self.start_date.format("%Y-%m-%d"), self.start_clock)
    }

    pub fn end_value(&self) -> String {
        format!("{}T{}", self.end_date.format("%Y-%m-%d"), self.end_clock)
    }
}

/// Inline task being created together with the plan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTaskDraft {
    pub title: String,
    pub description: String,
    /// Free text, expected `YYYY-MM-DD`
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskSource {
    New(NewTask),
    Existing(TaskId),
}

/// A validated submit, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub target: FormMode,
    pub task: TaskSource,
    pub day: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub note: Option<String>,
}

impl SubmitRequest {
    fn payload(&self, task_id: TaskId) -> PlanPayload {
        PlanPayload {
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            note: self.note.clone(),
            task_id,
        }
    }
}

/// Send a validated submit: create the inline task if there is one, then
/// create or update the plan. Stops at the first failure.
pub fn execute<R: PlanRepository + ?Sized>(
    repository: &R,
    user: &UserId,
    request: SubmitRequest,
) -> Result<(), PlannerError> {
    let task_id = match &request.task {
        TaskSource::New(new_task) => {
            let created = repository.create_task(user, new_task)?;
            log::info!("Created task {} for new plan", created.id);
            created.id
        }
        TaskSource::Existing(task_id) => task_id.clone(),
    };

    let payload = request.payload(task_id.clone());
    match &request.target {
        FormMode::Edit(plan_id) => {
            repository.update_plan(plan_id, &payload)?;
            log::info!("Updated plan {}", plan_id);
        }
        FormMode::Create => {
            repository.create_plan(user, &task_id, &payload)?;
            log::info!("Created plan for task {} on day {}", task_id, payload.day);
        }
    }

    Ok(())
}

pub struct PlanFormController {
    mode: FormMode,
    zone: DisplayZone,
    data: PlanFormData,
    draft: NewTaskDraft,
    create_new_task: bool,
    tasks: Vec<Task>,
    tasks_loading: bool,
    phase: SubmitPhase,
}

impl PlanFormController {
    /// Blank form for a grid cell: `today` at the cell's hour, one hour long,
    /// with a new inline task due the same day.
    pub fn for_create(cell: GridCell, zone: DisplayZone, today: NaiveDate) -> Self {
        let start_time = NaiveTime::from_hms_opt(cell.hour.hour(), 0, 0).unwrap_or_default();
        let start = today.and_time(start_time);
        let end = start + Duration::hours(1);

        Self {
            mode: FormMode::Create,
            zone,
            data: PlanFormData {
                day: cell.day,
                start_date: start.date(),
                start_clock: format_clock(start.time()),
                end_date: end.date(),
                end_clock: format_clock(end.time()),
                note: String::new(),
                task_id: None,
            },
            draft: NewTaskDraft {
                due_date: start.date().format("%Y-%m-%d").to_string(),
                ..NewTaskDraft::default()
            },
            create_new_task: true,
            tasks: Vec::new(),
            tasks_loading: true,
            phase: SubmitPhase::Idle,
        }
    }

    /// Form seeded from an existing plan, times shown in the display zone.
    pub fn for_edit(plan: &DailyPlan, zone: DisplayZone) -> Self {
        let start = zone.to_wall_clock(plan.start_time);
        let end = zone.to_wall_clock(plan.end_time);

        Self {
            mode: FormMode::Edit(plan.id.clone()),
            zone,
            data: PlanFormData {
                day: plan.day,
                start_date: start.date(),
                start_clock: format_clock(start.time()),
                end_date: end.date(),
                end_clock: format_clock(end.time()),
                note: plan.note.clone().unwrap_or_default(),
                task_id: Some(plan.task_id.clone()),
            },
            draft: NewTaskDraft::default(),
            create_new_task: false,
            tasks: Vec::new(),
            tasks_loading: true,
            phase: SubmitPhase::Idle,
        }
    }

    /// Fetch the tasks offered by the task chooser. Any failure leaves an
    /// empty list; a cancelled token leaves the form untouched.
    pub fn load_tasks<R: PlanRepository + ?Sized>(
        &mut self,
        repository: &R,
        user: &UserId,
        token: &CancellationToken,
    ) {
        self.tasks_loading = true;
        let result = repository.list_tasks(user);
        if token.is_cancelled() {
            log::debug!("Task list arrived after the form closed; dropping it");
            return;
        }

        self.tasks = result.unwrap_or_else(|err| {
            log::warn!("Could not load tasks: {}", err);
            Vec::new()
        });
        self.tasks_loading = false;
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn data(&self) -> &PlanFormData {
        &self.data
    }

    pub fn draft(&self) -> &NewTaskDraft {
        &self.draft
    }

    pub fn create_new_task(&self) -> bool {
        self.create_new_task
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading_tasks(&self) -> bool {
        self.tasks_loading
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Inline error from the last failed submit
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SubmitPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let task_id = self.data.task_id.as_ref()?;
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    pub fn heading(&self) -> String {
        let day = long_day_label(self.data.day).unwrap_or("Day");
        match self.mode {
            FormMode::Edit(_) => format!("Edit Plan - {}", day),
            FormMode::Create => format!("New Plan - {}", day),
        }
    }

    pub fn select_day(&mut self, day: u8) -> Result<(), PlannerError> {
        if !is_valid_day(day) {
            return Err(PlannerError::InvalidDay(day));
        }
        self.data.day = day;
        Ok(())
    }

    /// Replace the start `HH:MM`; the start date stays as opened.
    pub fn set_start_time(&mut self, clock: &str) {
        self.data.start_clock = clock.trim().to_string();
    }

    /// Replace the end `HH:MM`; the end date stays as opened.
    pub fn set_end_time(&mut self, clock: &str) {
        self.data.end_clock = clock.trim().to_string();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.data.note = note.into();
    }

    /// Ignored while editing: an existing plan always keeps a chosen task.
    pub fn set_create_new_task(&mut self, enabled: bool) {
        if self.is_editing() {
            log::debug!("Inline task creation is not available when editing a plan");
            self.create_new_task = false;
            return;
        }
        self.create_new_task = enabled;
    }

    pub fn toggle_create_new_task(&mut self) {
        self.set_create_new_task(!self.create_new_task);
    }

    pub fn select_task(&mut self, task_id: Option<TaskId>) {
        self.data.task_id = task_id.filter(|id| !id.as_str().is_empty());
    }

    pub fn set_task_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_task_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_due_date(&mut self, due_date: impl Into<String>) {
        self.draft.due_date = due_date.into();
    }

    /// Validate and enter the submitting phase.
    ///
    /// Rejected with [`PlannerError::SubmitInProgress`] while a previous
    /// submit has not finished. Validation failures are recorded as the
    /// form's error and no request is produced.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, PlannerError> {
        if self.is_submitting() {
            return Err(PlannerError::SubmitInProgress);
        }

        match self.validate() {
            Ok(request) => {
                self.phase = SubmitPhase::Submitting;
                Ok(request)
            }
            Err(err) => {
                self.phase = SubmitPhase::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Leave the submitting phase with the outcome of [`execute`].
    pub fn finish_submit(&mut self, result: Result<(), PlannerError>) -> Result<(), PlannerError> {
        match &result {
            Ok(()) => self.phase = SubmitPhase::Idle,
            Err(err) => {
                log::error!("Saving plan failed: {}", err);
                self.phase = SubmitPhase::Failed(err.to_string());
            }
        }
        result
    }

    pub fn submit<R: PlanRepository + ?Sized>(
        &mut self,
        repository: &R,
        user: &UserId,
    ) -> Result<(), PlannerError> {
        let request = self.begin_submit()?;
        let result = execute(repository, user, request);
        self.finish_submit(result)
    }

    fn validate(&self) -> Result<SubmitRequest, PlannerError> {
        let task = if self.create_new_task && !self.is_editing() {
            let title = self.draft.title.trim();
            if title.is_empty() {
                return Err(PlannerError::TaskTitleRequired);
            }
            let due_date = parse_date(&self.draft.due_date)
                .ok_or_else(|| PlannerError::InvalidDueDate(self.draft.due_date.clone()))?;
            TaskSource::New(NewTask::pending(
                title,
                Some(self.draft.description.trim().to_string()),
                due_date.format("%Y-%m-%d").to_string(),
            ))
        } else {
            match &self.data.task_id {
                Some(task_id) => TaskSource::Existing(task_id.clone()),
                None => return Err(PlannerError::TaskSelectionRequired),
            }
        };

        if !is_valid_day(self.data.day) {
            return Err(PlannerError::InvalidDay(self.data.day));
        }

        let start_time = self.resolve(self.data.start_date, &self.data.start_clock)?;
        let end_time = self.resolve(self.data.end_date, &self.data.end_clock)?;
        if end_time <= start_time {
            return Err(PlannerError::EndBeforeStart);
        }

        let note = Some(self.data.note.trim().to_string()).filter(|note| !note.is_empty());

        Ok(SubmitRequest {
            target: self.mode.clone(),
            task,
            day: self.data.day,
            start_time,
            end_time,
            note,
        })
    }

    fn resolve(&self, date: NaiveDate, clock: &str) -> Result<DateTime<Utc>, PlannerError> {
        let time = parse_clock(clock).ok_or_else(|| PlannerError::InvalidTime(clock.to_string()))?;
        self.zone
            .from_wall_clock(date.and_time(time))
            .ok_or_else(|| PlannerError::InvalidTime(clock.to_string()))
    }
}
