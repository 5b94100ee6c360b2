use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

/// Urgency level from 1 (most urgent) to 5 (least urgent).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);
    pub const ALL: [Priority; 5] = [Priority(1), Priority(2), Priority(3), Priority(4), Priority(5)];

    pub fn new(value: i64) -> Result<Self, TaskError> {
        if (1..=5).contains(&value) {
            Ok(Priority(value as u8))
        } else {
            Err(TaskError::InvalidPriority(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::HIGHEST
    }
}

impl TryFrom<i64> for Priority {
    type Error = TaskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl std::str::FromStr for Priority {
    type Err = TaskError;

    /// Accepts `3` as well as `p3` / `P3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('p')
            .or_else(|| trimmed.strip_prefix('P'))
            .unwrap_or(trimmed);
        let value: i64 = digits
            .parse()
            .map_err(|_| TaskError::InvalidPriority(trimmed.to_string()))?;
        Priority::new(value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Builds a fresh, incomplete task with a newly generated id.
    pub fn new(title: String, priority: Priority, due_date: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            priority,
            due_date,
            note: normalize_note(note),
            is_completed: false,
        }
    }

    pub fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }

    /// First eight characters of the id, enough to address a task from the CLI.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty())
}
