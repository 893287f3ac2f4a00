//! Row types for the external store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of follow-up task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Call,
    Email,
    Review,
}

impl TaskType {
    /// The closed set of accepted values.
    pub const ALL: [TaskType; 3] = [TaskType::Call, TaskType::Email, TaskType::Review];

    /// Parse a wire value. Anything outside the closed set is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call" => Some(TaskType::Call),
            "email" => Some(TaskType::Email),
            "review" => Some(TaskType::Review),
            _ => None,
        }
    }

    /// Accepted values joined for error messages ("call, email, review").
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Email => write!(f, "email"),
            Self::Review => write!(f, "review"),
        }
    }
}

/// Lifecycle status of a task. This codebase only ever moves a task from
/// open to completed, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// An application row. Read-only lookup source; only the fields this
/// service touches are mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub tenant_id: String,
}

/// A task row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub tenant_id: String,
    /// Id of the application this task is attached to.
    pub related_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub due_at: DateTime<Utc>,
    pub title: Option<String>,
    pub status: TaskStatus,
}

/// Insert payload for a new task. `due_at` is forwarded exactly as the
/// caller supplied it; the store parses it on its side.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub tenant_id: String,
    pub related_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub due_at: String,
    pub title: String,
    pub status: TaskStatus,
}
