// Plan module
// Daily plans: scheduled time blocks for a task on the weekly grid

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::grid::is_valid_day;
use crate::models::task::TaskId;
use crate::models::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlanId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A scheduled block of time for one task, owned by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlan {
    pub id: PlanId,
    /// 0 = Monday .. 6 = Sunday
    pub day: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub note: Option<String>,
    pub user_id: UserId,
    pub task_id: TaskId,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailyPlan {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_day(self.day) {
            return Err(format!("Plan day must be between 0 and 6, got {}", self.day));
        }

        if self.end_time <= self.start_time {
            return Err("Plan end time must be after start time".to_string());
        }

        Ok(())
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// Body of plan create and update requests
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPayload {
    pub day: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub task_id: TaskId,
}
