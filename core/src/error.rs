use thiserror::Error;

/// Domain errors raised while turning user input into tasks.
///
/// Classification and ranking never fail; these only come from the intent
/// layer and the input parsers.
#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("title is required")]
    EmptyTitle,
    #[error("due date cannot be in the past")]
    DueInPast,
    #[error("priority must be between 1 and 5, got `{0}`")]
    InvalidPriority(String),
    #[error("could not parse due date: {0}")]
    InvalidDueDate(String),
    #[error("unknown calendar `{0}`; expected local, utc or an offset like +09:00")]
    InvalidCalendar(String),
    #[error("task {0} not found")]
    NotFound(String),
    #[error("task id `{0}` is ambiguous")]
    AmbiguousId(String),
}
