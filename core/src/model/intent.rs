use chrono::{DateTime, Utc};

use crate::model::task::Priority;

/// Form input for creating or editing a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub note: Option<String>,
}

/// A change requested by the UI layer against the task collection.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskIntent {
    Create(TaskDraft),
    Update { id: String, draft: TaskDraft },
    Toggle(String),
    Delete(String),
}
