use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::error::TaskError;
use crate::model::intent::TaskIntent;
use crate::model::section::TaskSection;
use crate::model::task::Task;
use crate::repository::TaskRepository;
use crate::service::filter::TaskFilter;
use crate::service::grouping::group_tasks;
use crate::service::task_list::TaskList;
use crate::time::Calendar;

/// Couples the task collection with its persistence collaborator.
///
/// Storage failures are logged and swallowed: loading falls back to an empty
/// list and a failed save leaves the in-memory state as the source of truth.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    list: TaskList,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn load(repo: R) -> Self {
        let tasks = match repo.load() {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                error!("failed to load tasks: {e:#}");
                Vec::new()
            }
        };
        Self {
            repo,
            list: TaskList::new(tasks),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.list.find(id)
    }

    pub fn resolve_id(&self, prefix: &str) -> Result<String, TaskError> {
        self.list.resolve_id(prefix)
    }

    /// Applies an intent, then saves the whole collection.
    pub fn dispatch(&mut self, intent: TaskIntent, now: DateTime<Utc>) -> Result<Task, TaskError> {
        let task = self.list.apply(intent, now)?;
        self.persist();
        Ok(task)
    }

    /// Returns whether the save went through.
    pub fn persist(&self) -> bool {
        match self.repo.save(self.list.tasks()) {
            Ok(()) => {
                debug!(count = self.list.len(), "saved tasks");
                true
            }
            Err(e) => {
                error!("failed to save tasks: {e:#}");
                false
            }
        }
    }

    /// Search-filters the collection, then classifies and ranks it against
    /// a single `now` snapshot.
    pub fn sections(&self, now: DateTime<Utc>, calendar: Calendar, filter: &TaskFilter) -> Vec<TaskSection> {
        let visible = filter.apply(self.list.tasks());
        let sections = group_tasks(&visible, now, calendar);
        debug!(
            total = self.list.len(),
            visible = visible.len(),
            sections = sections.len(),
            "grouped tasks"
        );
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::intent::TaskDraft;
    use crate::model::section::Bucket;
    use crate::model::task::Priority;
    use anyhow::{anyhow, Result};
    use chrono::{Duration, TimeZone};
    use std::cell::RefCell;

    struct MockTaskRepo {
        stored: RefCell<Vec<Task>>,
        fail_load: bool,
        fail_save: bool,
    }

    impl MockTaskRepo {
        fn new(tasks: Vec<Task>) -> Self {
            Self { stored: RefCell::new(tasks), fail_load: false, fail_save: false }
        }
    }

    impl TaskRepository for MockTaskRepo {
        fn load(&self) -> Result<Vec<Task>> {
            if self.fail_load {
                return Err(anyhow!("disk on fire"));
            }
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, tasks: &[Task]) -> Result<()> {
            if self.fail_save {
                return Err(anyhow!("read-only"));
            }
            *self.stored.borrow_mut() = tasks.to_vec();
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn draft(title: &str, priority: i64, hours: i64) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            priority: Priority::new(priority).unwrap(),
            due_date: now() + Duration::hours(hours),
            note: None,
        }
    }

    #[test]
    fn test_load_failure_yields_empty_list() {
        let mut repo = MockTaskRepo::new(Vec::new());
        repo.fail_load = true;
        let service = TaskService::load(repo);
        assert!(service.tasks().is_empty());
    }

    #[test]
    fn test_dispatch_persists() {
        let mut service = TaskService::load(MockTaskRepo::new(Vec::new()));
        let task = service.dispatch(TaskIntent::Create(draft("Laundry", 3, 2)), now()).unwrap();

        assert_eq!(service.repo.stored.borrow().len(), 1);
        assert_eq!(service.repo.stored.borrow()[0].id, task.id);
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let mut repo = MockTaskRepo::new(Vec::new());
        repo.fail_save = true;
        let mut service = TaskService::load(repo);

        let task = service.dispatch(TaskIntent::Create(draft("Laundry", 3, 2)), now()).unwrap();
        assert!(!service.persist());
        assert_eq!(service.find(&task.id), Some(&task));
        assert!(service.repo.stored.borrow().is_empty());
    }

    #[test]
    fn test_sections_apply_search_before_grouping() {
        let mut service = TaskService::load(MockTaskRepo::new(Vec::new()));
        service.dispatch(TaskIntent::Create(draft("Call plumber", 2, 1)), now()).unwrap();
        service.dispatch(TaskIntent::Create(draft("Call bank", 1, 30)), now()).unwrap();
        service.dispatch(TaskIntent::Create(draft("Gym", 1, 2)), now()).unwrap();

        let filter = TaskFilter::new(Some("call".to_string()), None);
        let sections = service.sections(now(), Calendar::Utc, &filter);
        let buckets: Vec<Bucket> = sections.iter().map(|s| s.bucket).collect();
        assert_eq!(buckets, vec![Bucket::Today, Bucket::Tomorrow]);
        assert_eq!(sections[0].tasks[0].title, "Call plumber");

        let all = service.sections(now(), Calendar::Utc, &TaskFilter::default());
        assert_eq!(all[0].tasks.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), vec!["Gym", "Call plumber"]);
    }
}
