//! Wire records as the backend sends them.
//!
//! The backend exposes identities as `_id` and sometimes also as `id`. Both
//! are folded into the model's single id field here, before anything reaches
//! the controllers.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::plan::{DailyPlan, PlanId};
use crate::models::task::{Task, TaskId, TaskState};
use crate::models::user::UserId;
use crate::services::error::RepositoryError;

fn canonical_id(mongo_id: Option<String>, id: Option<String>) -> Option<String> {
    mongo_id
        .into_iter()
        .chain(id)
        .find(|value| !value.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDailyPlan {
    #[serde(rename = "_id", default)]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub day: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawDailyPlan {
    /// Normalise into the model. `owner` fills in a missing `userId`, since
    /// plans are always listed per user.
    pub fn into_plan(self, owner: &UserId) -> Result<DailyPlan, RepositoryError> {
        let id = canonical_id(self.mongo_id, self.id)
            .ok_or(RepositoryError::MissingIdentity("daily plan"))?;
        let task_id = self
            .task_id
            .filter(|value| !value.is_empty())
            .ok_or(RepositoryError::MissingIdentity("daily plan task"))?;

        Ok(DailyPlan {
            id: PlanId(id),
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            note: self.note.filter(|note| !note.is_empty()),
            user_id: self.user_id.map(UserId).unwrap_or_else(|| owner.clone()),
            task_id: TaskId(task_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    #[serde(rename = "_id", default)]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub notify_local_time: Option<String>,
    #[serde(default)]
    pub daily_minutes: Option<u32>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawTask> for Task {
    type Error = RepositoryError;

    fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
        let id = canonical_id(raw.mongo_id, raw.id).ok_or(RepositoryError::MissingIdentity("task"))?;

        Ok(Task {
            id: TaskId(id),
            title: raw.title,
            description: raw.description,
            state: raw.state,
            notify_local_time: raw.notify_local_time,
            daily_minutes: raw.daily_minutes,
            timezone: raw.timezone,
            due_date: raw.due_date,
            user_id: raw.user_id.map(UserId),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

/// Decode a plan list body.
pub fn decode_plans(body: &str, owner: &UserId) -> Result<Vec<DailyPlan>, RepositoryError> {
    let raw: Vec<RawDailyPlan> =
        serde_json::from_str(body).map_err(|err| RepositoryError::Decode(err.to_string()))?;
    raw.into_iter().map(|plan| plan.into_plan(owner)).collect()
}

/// Decode a task list body. Anything other than a JSON array counts as no
/// tasks.
pub fn decode_tasks(body: &str) -> Result<Vec<Task>, RepositoryError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|err| RepositoryError::Decode(err.to_string()))?;
    if !value.is_array() {
        log::warn!("Task list response was not an array; treating as empty");
        return Ok(Vec::new());
    }

    let raw: Vec<RawTask> =
        serde_json::from_value(value).map_err(|err| RepositoryError::Decode(err.to_string()))?;
    raw.into_iter().map(Task::try_from).collect()
}

/// Decode a single created task.
pub fn decode_task(body: &str) -> Result<Task, RepositoryError> {
    let raw: RawTask =
        serde_json::from_str(body).map_err(|err| RepositoryError::Decode(err.to_string()))?;
    Task::try_from(raw)
}
