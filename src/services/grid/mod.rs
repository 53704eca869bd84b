//! Weekly calendar screen: the loaded plans, cell selection, the plan form
//! and delete confirmation.
//!
//! The plan list is only ever replaced wholesale by a refetch; nothing is
//! removed or merged locally ahead of the server.

use crate::models::grid::{is_valid_day, GridCell, HourLabel};
use crate::models::plan::{DailyPlan, PlanId};
use crate::models::user::User;
use crate::services::cancellation::CancellationToken;
use crate::services::error::{PlannerError, RepositoryError};
use crate::services::plan_form::PlanFormController;
use crate::services::repository::PlanRepository;
use crate::services::session::SessionProvider;
use crate::services::slots::{self, GridRow};
use crate::utils::date::{format_instant, DisplayZone};

/// How a load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { plans: usize },
    NoSession,
    MissingConfig,
    /// The screen went away first; nothing was applied
    Cancelled,
    Failed(String),
}

/// A delete waiting for the user to confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub plan_id: PlanId,
    pub title: &'static str,
    pub message: String,
}

pub struct CalendarGridController<R, S> {
    repository: R,
    session: S,
    zone: DisplayZone,
    scope: CancellationToken,
    user: Option<User>,
    daily_plans: Vec<DailyPlan>,
    loading: bool,
    selected_cell: GridCell,
    editing_plan: Option<DailyPlan>,
    form: Option<PlanFormController>,
    pending_delete: Option<PendingDelete>,
    alert: Option<String>,
}

impl<R: PlanRepository, S: SessionProvider> CalendarGridController<R, S> {
    pub fn new(repository: R, session: S, zone: DisplayZone) -> Self {
        Self {
            repository,
            session,
            zone,
            scope: CancellationToken::new(),
            user: None,
            daily_plans: Vec::new(),
            loading: true,
            selected_cell: GridCell::default(),
            editing_plan: None,
            form: None,
            pending_delete: None,
            alert: None,
        }
    }

    /// Initial load under the screen's own cancellation scope.
    pub fn mount(&mut self) -> LoadOutcome {
        let token = self.scope.clone();
        self.load(&token)
    }

    /// Tear the screen down. Loads still running under the screen scope will
    /// not apply their results.
    pub fn unmount(&mut self) {
        self.scope.cancel();
        self.form = None;
        log::debug!("Calendar screen unmounted");
    }

    /// Token cancelled by [`unmount`](Self::unmount)
    pub fn scope(&self) -> CancellationToken {
        self.scope.clone()
    }

    /// Load the user and their plans.
    ///
    /// Every state change happens after the token is checked, so a cancelled
    /// load leaves the controller exactly as it was.
    pub fn load(&mut self, token: &CancellationToken) -> LoadOutcome {
        let session = self.session.current_user();
        if token.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        let user = match session {
            Ok(Some(user)) => user,
            Ok(None) => {
                log::error!("No signed-in user; calendar load aborted");
                self.loading = false;
                return LoadOutcome::NoSession;
            }
            Err(err) => {
                log::error!("Could not fetch the current user: {}", err);
                self.loading = false;
                return LoadOutcome::Failed(err.to_string());
            }
        };

        let plans = self.repository.list_plans(&user.id);
        if token.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        self.user = Some(user);
        self.loading = false;
        match plans {
            Ok(plans) => {
                self.replace_plans(plans);
                LoadOutcome::Loaded {
                    plans: self.daily_plans.len(),
                }
            }
            Err(RepositoryError::MissingBaseUrl) => {
                log::error!("API base URL is not configured; calendar load aborted");
                LoadOutcome::MissingConfig
            }
            Err(RepositoryError::Status { status, .. }) => {
                log::warn!("Daily plans request returned HTTP {}; showing no plans", status);
                self.daily_plans.clear();
                LoadOutcome::Loaded { plans: 0 }
            }
            Err(err) => {
                log::error!("Error loading daily plans: {}", err);
                LoadOutcome::Failed(err.to_string())
            }
        }
    }

    /// Refetch the full plan list and replace the local one.
    ///
    /// A non-success status counts as an empty list. Transport and decode
    /// failures keep the current list.
    pub fn refresh_plans(&mut self) -> Result<(), PlannerError> {
        let user_id = self
            .user
            .as_ref()
            .map(|user| user.id.clone())
            .ok_or(PlannerError::NoSession)?;

        match self.repository.list_plans(&user_id) {
            Ok(plans) => {
                self.replace_plans(plans);
                Ok(())
            }
            Err(RepositoryError::Status { status, .. }) => {
                log::warn!("Daily plans refetch returned HTTP {}; showing no plans", status);
                self.daily_plans.clear();
                Ok(())
            }
            Err(err) => {
                log::error!("Error refreshing daily plans: {}", err);
                Err(err.into())
            }
        }
    }

    fn replace_plans(&mut self, plans: Vec<DailyPlan>) {
        for plan in &plans {
            if let Err(reason) = plan.validate() {
                log::warn!("Plan {} is inconsistent: {}", plan.id, reason);
            }
        }
        let hidden = slots::hidden_plans(&plans, &self.zone).len();
        if hidden > 0 {
            log::info!("{} plan(s) start outside the grid hours and are not shown", hidden);
        }
        self.daily_plans = plans;
    }

    /// Open the form in create mode for a cell.
    pub fn select_cell(&mut self, day: u8, hour: HourLabel) -> Result<(), PlannerError> {
        if !is_valid_day(day) {
            return Err(PlannerError::InvalidDay(day));
        }
        self.selected_cell = GridCell { day, hour };
        self.open_blank();
        Ok(())
    }

    /// Open the form in create mode for the last selected cell.
    pub fn open_blank(&mut self) {
        self.editing_plan = None;
        let form = PlanFormController::for_create(self.selected_cell, self.zone, self.zone.today());
        self.open_form(form);
    }

    /// Open the form in edit mode for a loaded plan.
    pub fn edit_plan(&mut self, plan_id: &PlanId) -> Result<(), PlannerError> {
        let plan = self
            .find_plan(plan_id)
            .cloned()
            .ok_or_else(|| PlannerError::UnknownPlan(plan_id.clone()))?;
        let form = PlanFormController::for_edit(&plan, self.zone);
        self.editing_plan = Some(plan);
        self.open_form(form);
        Ok(())
    }

    fn open_form(&mut self, mut form: PlanFormController) {
        match &self.user {
            Some(user) => form.load_tasks(&self.repository, &user.id, &self.scope),
            None => log::warn!("Plan form opened without a signed-in user; task list not loaded"),
        }
        self.form = Some(form);
    }

    pub fn close_modal(&mut self) {
        self.form = None;
    }

    /// Submit the open form. On success the plan list is refetched and the
    /// form closes; on failure the form stays open and the error is raised
    /// as an alert.
    pub fn submit_form(&mut self) -> Result<(), PlannerError> {
        let result = self.submit_open_form();
        if let Err(err) = &result {
            if *err != PlannerError::SubmitInProgress {
                self.alert = Some(err.to_string());
            }
            return result;
        }

        if let Err(err) = self.refresh_plans() {
            log::error!("Plan saved but the list could not be refreshed: {}", err);
        }
        self.close_modal();
        Ok(())
    }

    fn submit_open_form(&mut self) -> Result<(), PlannerError> {
        let form = self.form.as_mut().ok_or(PlannerError::FormClosed)?;
        let user_id = match &self.user {
            Some(user) => user.id.clone(),
            None => return Err(PlannerError::NoSession),
        };
        form.submit(&self.repository, &user_id)
    }

    /// Ask for confirmation before deleting a plan.
    pub fn request_delete(&mut self, plan_id: &PlanId) -> Result<&PendingDelete, PlannerError> {
        let plan = self
            .find_plan(plan_id)
            .ok_or_else(|| PlannerError::UnknownPlan(plan_id.clone()))?;
        let message = format!(
            "Are you sure you want to delete the plan {} - {}?",
            format_instant(plan.start_time, &self.zone),
            format_instant(plan.end_time, &self.zone)
        );
        Ok(self.pending_delete.insert(PendingDelete {
            plan_id: plan_id.clone(),
            title: "Delete Plan",
            message,
        }))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending plan, then refetch the list whatever the delete's
    /// outcome. Does nothing when no delete is pending.
    pub fn confirm_delete(&mut self) -> Result<(), PlannerError> {
        let Some(pending) = self.pending_delete.take() else {
            return Ok(());
        };

        let deleted = self.repository.delete_plan(&pending.plan_id);
        let refreshed = self.refresh_plans();

        if let Err(err) = deleted {
            log::error!("Could not delete plan {}: {}", pending.plan_id, err);
            self.alert = Some("Could not delete the plan".to_string());
            return Err(err.into());
        }
        if let Err(err) = refreshed {
            self.alert = Some("Could not delete the plan".to_string());
            return Err(err);
        }

        log::info!("Deleted plan {}", pending.plan_id);
        Ok(())
    }

    pub fn plans_for_slot(&self, day: u8, hour: HourLabel) -> Vec<&DailyPlan> {
        slots::plans_for_slot(&self.daily_plans, day, hour, &self.zone)
    }

    pub fn week_grid(&self) -> Vec<GridRow<'_>> {
        slots::week_grid(&self.daily_plans, &self.zone)
    }

    /// `HH:MM - HH:MM` label for a plan card
    pub fn plan_time_label(&self, plan: &DailyPlan) -> String {
        format!(
            "{} - {}",
            format_instant(plan.start_time, &self.zone),
            format_instant(plan.end_time, &self.zone)
        )
    }

    fn find_plan(&self, plan_id: &PlanId) -> Option<&DailyPlan> {
        self.daily_plans.iter().find(|plan| &plan.id == plan_id)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Coin balance for the header, `0` when nobody is signed in
    pub fn coins(&self) -> u64 {
        self.user.as_ref().map_or(0, |user| user.coins)
    }

    pub fn daily_plans(&self) -> &[DailyPlan] {
        &self.daily_plans
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_cell(&self) -> GridCell {
        self.selected_cell
    }

    pub fn editing_plan(&self) -> Option<&DailyPlan> {
        self.editing_plan.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&PlanFormController> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut PlanFormController> {
        self.form.as_mut()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn zone(&self) -> &DisplayZone {
        &self.zone
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Take the blocking alert raised by the last failed action
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
