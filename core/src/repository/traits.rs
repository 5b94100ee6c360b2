use crate::model::task::Task;
use anyhow::Result;

/// Key-value style persistence for the whole task collection.
pub trait TaskRepository {
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}
