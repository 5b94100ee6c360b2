use chrono::{DateTime, NaiveDate, Utc};

use crate::model::section::{Bucket, TaskSection};
use crate::model::task::Task;
use crate::service::ranking::rank_in_place;
use crate::time::Calendar;

/// Picks the bucket for a single task.
///
/// `today` must be `calendar.day_of(now)` captured once for the whole pass.
/// A task due exactly at `now` is not overdue.
pub fn bucket_for(task: &Task, now: DateTime<Utc>, today: NaiveDate, calendar: Calendar) -> Bucket {
    if task.due_date < now {
        return Bucket::Overdue;
    }

    let due_day = calendar.day_of(task.due_date);
    if due_day == today {
        Bucket::Today
    } else if Some(due_day) == today.succ_opt() {
        Bucket::Tomorrow
    } else {
        Bucket::Upcoming
    }
}

/// Partitions `tasks` into the non-empty buckets, in `Bucket::ALL` order.
///
/// Every task ends up in exactly one section and keeps its input order
/// within that section.
pub fn classify(tasks: &[Task], now: DateTime<Utc>, calendar: Calendar) -> Vec<TaskSection> {
    let today = calendar.day_of(now);
    let mut groups: [Vec<Task>; 4] = Default::default();

    for task in tasks {
        let bucket = bucket_for(task, now, today, calendar);
        groups[bucket as usize].push(task.clone());
    }

    Bucket::ALL
        .into_iter()
        .zip(groups)
        .filter(|(_, tasks)| !tasks.is_empty())
        .map(|(bucket, tasks)| TaskSection { bucket, tasks })
        .collect()
}

/// Classifies and then ranks each section: the grouped view.
pub fn group_tasks(tasks: &[Task], now: DateTime<Utc>, calendar: Calendar) -> Vec<TaskSection> {
    let mut sections = classify(tasks, now, calendar);
    for section in &mut sections {
        rank_in_place(&mut section.tasks);
    }
    sections
}
