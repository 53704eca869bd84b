use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};

use super::wire::{decode_plans, decode_task, decode_tasks};
use super::PlanRepository;
use crate::models::plan::{DailyPlan, PlanId, PlanPayload};
use crate::models::task::{NewTask, Task, TaskId};
use crate::models::user::UserId;
use crate::services::error::RepositoryError;

/// Blocking REST client for the planner backend.
///
/// A missing base URL is not a construction error: every call then fails
/// with [`RepositoryError::MissingBaseUrl`] so the grid can report it the
/// same way it reports any other load problem.
pub struct RestPlanRepository {
    client: Client,
    base_url: Option<String>,
}

impl RestPlanRepository {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to build planner HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn url(&self, segments: &[&str]) -> Result<String, RepositoryError> {
        let mut url = self
            .base_url
            .clone()
            .ok_or(RepositoryError::MissingBaseUrl)?;
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        Ok(url)
    }

    fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, RepositoryError> {
        let response = request
            .send()
            .map_err(|err| RepositoryError::Transport(format!("{}: {}", operation, err)))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} returned HTTP {}", operation, status);
            return Err(RepositoryError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    fn read_body(operation: &'static str, response: Response) -> Result<String, RepositoryError> {
        response
            .text()
            .map_err(|err| RepositoryError::Transport(format!("{}: {}", operation, err)))
    }
}

impl PlanRepository for RestPlanRepository {
    fn list_plans(&self, user: &UserId) -> Result<Vec<DailyPlan>, RepositoryError> {
        const OP: &str = "list daily plans";
        let url = self.url(&["daily-plans", "user", user.as_str()])?;
        let response = self.send(OP, self.client.get(url))?;
        decode_plans(&Self::read_body(OP, response)?, user)
    }

    fn create_plan(
        &self,
        user: &UserId,
        task: &TaskId,
        payload: &PlanPayload,
    ) -> Result<(), RepositoryError> {
        let url = self.url(&["daily-plans", user.as_str(), task.as_str()])?;
        self.send("create daily plan", self.client.post(url).json(payload))?;
        Ok(())
    }

    fn update_plan(&self, plan: &PlanId, payload: &PlanPayload) -> Result<(), RepositoryError> {
        let url = self.url(&["daily-plans", plan.as_str()])?;
        self.send("update daily plan", self.client.patch(url).json(payload))?;
        Ok(())
    }

    fn delete_plan(&self, plan: &PlanId) -> Result<(), RepositoryError> {
        let url = self.url(&["daily-plans", plan.as_str()])?;
        self.send("delete daily plan", self.client.delete(url))?;
        Ok(())
    }

    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, RepositoryError> {
        const OP: &str = "list tasks";
        let url = self.url(&["tasks", "user", user.as_str()])?;
        let response = self.send(OP, self.client.get(url))?;
        decode_tasks(&Self::read_body(OP, response)?)
    }

    fn create_task(&self, user: &UserId, task: &NewTask) -> Result<Task, RepositoryError> {
        const OP: &str = "create task";
        let url = self.url(&["tasks", user.as_str()])?;
        let response = self.send(OP, self.client.post(url).json(task))?;
        decode_task(&Self::read_body(OP, response)?)
    }
}
