//! Plan and task repository contract plus its REST implementation.
//!
//! Every operation is a single request/response. Success is judged by HTTP
//! status alone and nothing here retries.

pub mod rest;
pub mod wire;

pub use rest::RestPlanRepository;

use crate::models::plan::{DailyPlan, PlanId, PlanPayload};
use crate::models::task::{NewTask, Task, TaskId};
use crate::models::user::UserId;
use crate::services::error::RepositoryError;

#[cfg_attr(test, mockall::automock)]
pub trait PlanRepository {
    /// All plans owned by the user, in server order
    fn list_plans(&self, user: &UserId) -> Result<Vec<DailyPlan>, RepositoryError>;

    fn create_plan(
        &self,
        user: &UserId,
        task: &TaskId,
        payload: &PlanPayload,
    ) -> Result<(), RepositoryError>;

    fn update_plan(&self, plan: &PlanId, payload: &PlanPayload) -> Result<(), RepositoryError>;

    fn delete_plan(&self, plan: &PlanId) -> Result<(), RepositoryError>;

    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, RepositoryError>;

    /// Create a task and return it with its server-assigned identity
    fn create_task(&self, user: &UserId, task: &NewTask) -> Result<Task, RepositoryError>;
}

impl<R: PlanRepository + ?Sized> PlanRepository for &R {
    fn list_plans(&self, user: &UserId) -> Result<Vec<DailyPlan>, RepositoryError> {
        (**self).list_plans(user)
    }

    fn create_plan(
        &self,
        user: &UserId,
        task: &TaskId,
        payload: &PlanPayload,
    ) -> Result<(), RepositoryError> {
        (**self).create_plan(user, task, payload)
    }

    fn update_plan(&self, plan: &PlanId, payload: &PlanPayload) -> Result<(), RepositoryError> {
        (**self).update_plan(plan, payload)
    }

    fn delete_plan(&self, plan: &PlanId) -> Result<(), RepositoryError> {
        (**self).delete_plan(plan)
    }

    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, RepositoryError> {
        (**self).list_tasks(user)
    }

    fn create_task(&self, user: &UserId, task: &NewTask) -> Result<Task, RepositoryError> {
        (**self).create_task(user, task)
    }
}
