pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock, Ticker};
pub use config::AppConfig;
pub use error::TaskError;
pub use input::{edit_line, expand_key, parse_args, split_input, ParsedInput, TaskFields};
pub use model::intent::{TaskDraft, TaskIntent};
pub use model::section::{Bucket, TaskSection};
pub use model::task::{Priority, Task};
pub use repository::{FileTaskRepository, TaskRepository};
pub use service::filter::{select_section, TaskFilter};
pub use service::grouping::{bucket_for, classify, group_tasks};
pub use service::ranking::{compare_tasks, compare_titles, rank, rank_in_place};
pub use service::task_list::TaskList;
pub use service::task_service::TaskService;
pub use time::{parse_due, Calendar};
