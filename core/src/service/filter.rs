use crate::model::section::{Bucket, TaskSection};
use crate::model::task::{Priority, Task};

/// Optional search text and priority chip applied around the pipeline.
///
/// Filtering only removes tasks, so a task that survives the filter lands in
/// the same bucket it would have without it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub query: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn new(query: Option<String>, priority: Option<Priority>) -> Self {
        Self { query, priority }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_query().is_none() && self.priority.is_none()
    }

    /// Case-insensitive title substring match and exact priority match.
    pub fn matches(&self, task: &Task) -> bool {
        let query_ok = match self.normalized_query() {
            Some(q) => task.title.to_lowercase().contains(&q),
            None => true,
        };
        let priority_ok = self.priority.map_or(true, |p| task.priority == p);
        query_ok && priority_ok
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// Tasks of one bucket, optionally narrowed to a single priority. Empty when
/// the bucket is not present in `sections`.
pub fn select_section(sections: &[TaskSection], bucket: Bucket, priority: Option<Priority>) -> Vec<Task> {
    sections
        .iter()
        .find(|s| s.bucket == bucket)
        .map(|s| {
            s.tasks
                .iter()
                .filter(|t| priority.map_or(true, |p| t.priority == p))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
