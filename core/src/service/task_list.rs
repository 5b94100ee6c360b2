use chrono::{DateTime, Utc};

use crate::error::TaskError;
use crate::model::intent::{TaskDraft, TaskIntent};
use crate::model::task::{normalize_note, Task};

/// The in-memory task collection owned by the UI layer.
///
/// All mutations go through [`TaskList::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Expands a unique id prefix to the full id.
    pub fn resolve_id(&self, prefix: &str) -> Result<String, TaskError> {
        if let Some(task) = self.find(prefix) {
            return Ok(task.id.clone());
        }
        let mut matches = self.tasks.iter().filter(|t| t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) if !prefix.is_empty() => Ok(task.id.clone()),
            (Some(_), _) => Err(TaskError::AmbiguousId(prefix.to_string())),
            (None, _) => Err(TaskError::NotFound(prefix.to_string())),
        }
    }

    /// Applies one intent and returns the task it touched (the removed task
    /// for `Delete`). On error the collection is left unchanged.
    pub fn apply(&mut self, intent: TaskIntent, now: DateTime<Utc>) -> Result<Task, TaskError> {
        match intent {
            TaskIntent::Create(draft) => {
                let draft = validate(draft)?;
                if draft.due_date < now {
                    return Err(TaskError::DueInPast);
                }
                let task = Task::new(draft.title, draft.priority, draft.due_date, draft.note);
                self.tasks.push(task.clone());
                Ok(task)
            }
            TaskIntent::Update { id, draft } => {
                let draft = validate(draft)?;
                let task = self.find_mut(&id)?;
                task.title = draft.title;
                task.priority = draft.priority;
                task.due_date = draft.due_date;
                task.note = draft.note;
                Ok(task.clone())
            }
            TaskIntent::Toggle(id) => {
                let task = self.find_mut(&id)?;
                task.toggle();
                Ok(task.clone())
            }
            TaskIntent::Delete(id) => {
                let pos = self
                    .tasks
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or(TaskError::NotFound(id))?;
                Ok(self.tasks.remove(pos))
            }
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }
}

fn validate(mut draft: TaskDraft) -> Result<TaskDraft, TaskError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    draft.title = title.to_string();
    draft.note = normalize_note(draft.note);
    Ok(draft)
}
