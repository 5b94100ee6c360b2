use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Time bucket a task lands in relative to the moment of classification.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    Upcoming,
}

impl Bucket {
    /// Fixed output order of the grouped view.
    pub const ALL: [Bucket; 4] = [Bucket::Overdue, Bucket::Today, Bucket::Tomorrow, Bucket::Upcoming];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::Upcoming => "Upcoming",
        }
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket::Today
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category `{}`", s))
    }
}

/// A labelled group of tasks. Empty sections are never produced.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TaskSection {
    pub bucket: Bucket,
    pub tasks: Vec<Task>,
}

impl TaskSection {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket() {
        assert_eq!("overdue".parse::<Bucket>().unwrap(), Bucket::Overdue);
        assert_eq!(" Tomorrow ".parse::<Bucket>().unwrap(), Bucket::Tomorrow);
        assert!("later".parse::<Bucket>().is_err());
    }
}
