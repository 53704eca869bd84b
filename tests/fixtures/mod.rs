// Test fixtures - reusable test data
// Provides an in-memory planner backend and sample plans for integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use chrono::{DateTime, TimeZone, Utc};

use pomodoro_planner::models::plan::{DailyPlan, PlanId, PlanPayload};
use pomodoro_planner::models::task::{NewTask, Task, TaskId, TaskState};
use pomodoro_planner::models::user::UserId;
use pomodoro_planner::services::error::RepositoryError;
use pomodoro_planner::services::repository::PlanRepository;

/// Sample instants for testing
pub mod dates {
    use super::*;

    /// Wednesday Jan 3, 2024 at the given UTC hour
    pub fn wednesday_at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, hour, 0, 0).unwrap()
    }
}

/// Sample plans and tasks for testing
pub mod plans {
    use super::*;

    pub fn task(id: &str, title: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: title.to_string(),
            description: None,
            state: TaskState::Pending,
            notify_local_time: None,
            daily_minutes: None,
            timezone: None,
            due_date: Some("2024-01-03".to_string()),
            user_id: Some(UserId::from("u1")),
            created_at: None,
            updated_at: None,
        }
    }

    /// A one-hour Wednesday plan starting at `hour` UTC
    pub fn wednesday_plan(id: &str, task: &str, hour: u32) -> DailyPlan {
        DailyPlan {
            id: PlanId::from(id),
            day: 2,
            start_time: dates::wednesday_at(hour),
            end_time: dates::wednesday_at(hour + 1),
            note: None,
            user_id: UserId::from("u1"),
            task_id: TaskId::from(task),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A request the fake backend received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListPlans(UserId),
    CreatePlan { task: TaskId, payload: PlanPayload },
    UpdatePlan { plan: PlanId, payload: PlanPayload },
    DeletePlan(PlanId),
    ListTasks(UserId),
    CreateTask(NewTask),
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::ListPlans(_) | Call::ListTasks(_))
    }
}

/// In-memory planner backend that records every request.
#[derive(Default)]
pub struct FakeBackend {
    plans: RefCell<Vec<DailyPlan>>,
    tasks: RefCell<Vec<Task>>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    fail_writes: Cell<bool>,
}

impl FakeBackend {
    pub fn with_data(plans: Vec<DailyPlan>, tasks: Vec<Task>) -> Self {
        let backend = Self::default();
        backend.plans.replace(plans);
        backend.tasks.replace(tasks);
        backend
    }

    /// Change server state behind the client's back
    pub fn insert_plan(&self, plan: DailyPlan) {
        self.plans.borrow_mut().push(plan);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn plans(&self) -> Vec<DailyPlan> {
        self.plans.borrow().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{}-{}", prefix, id)
    }

    fn check_write(&self, operation: &'static str) -> Result<(), RepositoryError> {
        if self.fail_writes.get() {
            Err(RepositoryError::Status {
                operation,
                status: 500,
            })
        } else {
            Ok(())
        }
    }
}

impl PlanRepository for FakeBackend {
    fn list_plans(&self, user: &UserId) -> Result<Vec<DailyPlan>, RepositoryError> {
        self.record(Call::ListPlans(user.clone()));
        Ok(self
            .plans
            .borrow()
            .iter()
            .filter(|plan| &plan.user_id == user)
            .cloned()
            .collect())
    }

    fn create_plan(
        &self,
        user: &UserId,
        task: &TaskId,
        payload: &PlanPayload,
    ) -> Result<(), RepositoryError> {
        self.record(Call::CreatePlan {
            task: task.clone(),
            payload: payload.clone(),
        });
        self.check_write("create plan")?;

        let id = self.next_id("plan");
        self.plans.borrow_mut().push(DailyPlan {
            id: PlanId(id),
            day: payload.day,
            start_time: payload.start_time,
            end_time: payload.end_time,
            note: payload.note.clone(),
            user_id: user.clone(),
            task_id: task.clone(),
            created_at: None,
            updated_at: None,
        });
        Ok(())
    }

    fn update_plan(&self, plan: &PlanId, payload: &PlanPayload) -> Result<(), RepositoryError> {
        self.record(Call::UpdatePlan {
            plan: plan.clone(),
            payload: payload.clone(),
        });
        self.check_write("update plan")?;

        let mut plans = self.plans.borrow_mut();
        let stored = plans
            .iter_mut()
            .find(|stored| &stored.id == plan)
            .ok_or(RepositoryError::Status {
                operation: "update plan",
                status: 404,
            })?;
        stored.day = payload.day;
        stored.start_time = payload.start_time;
        stored.end_time = payload.end_time;
        stored.note = payload.note.clone();
        stored.task_id = payload.task_id.clone();
        Ok(())
    }

    fn delete_plan(&self, plan: &PlanId) -> Result<(), RepositoryError> {
        self.record(Call::DeletePlan(plan.clone()));
        self.check_write("delete plan")?;

        let mut plans = self.plans.borrow_mut();
        let before = plans.len();
        plans.retain(|stored| &stored.id != plan);
        if plans.len() == before {
            return Err(RepositoryError::Status {
                operation: "delete plan",
                status: 404,
            });
        }
        Ok(())
    }

    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, RepositoryError> {
        self.record(Call::ListTasks(user.clone()));
        Ok(self.tasks())
    }

    fn create_task(&self, user: &UserId, task: &NewTask) -> Result<Task, RepositoryError> {
        self.record(Call::CreateTask(task.clone()));
        self.check_write("create task")?;

        let created = Task {
            id: TaskId(self.next_id("task")),
            title: task.title.clone(),
            description: task.description.clone(),
            state: task.state,
            notify_local_time: None,
            daily_minutes: None,
            timezone: None,
            due_date: Some(task.due_date.clone()),
            user_id: Some(user.clone()),
            created_at: None,
            updated_at: None,
        };
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }
}
