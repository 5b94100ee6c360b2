use std::cmp::Ordering;

use crate::model::task::Task;

/// Ordering within a section: open tasks first, then priority (1 first),
/// then earliest due, then title (see [`compare_titles`]).
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then(a.priority.cmp(&b.priority))
        .then(a.due_date.cmp(&b.due_date))
        .then_with(|| compare_titles(&a.title, &b.title))
}

/// Dictionary-style title order: letters compare ignoring case, so `apple`
/// sorts before `Banana`. Titles that differ only in case put the lowercase
/// form first; the ordinal order settles anything left.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<char>>();
    folded(a)
        .cmp(&folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Stable sort; fully equal tasks keep their relative order.
pub fn rank_in_place(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

pub fn rank(mut tasks: Vec<Task>) -> Vec<Task> {
    rank_in_place(&mut tasks);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn task(id: &str, title: &str, priority: i64, due: DateTime<Utc>, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            priority: Priority::new(priority).unwrap(),
            due_date: due,
            note: None,
            is_completed: completed,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_title_breaks_ties() {
        let ranked = rank(vec![
            task("b", "Banana", 2, base(), false),
            task("a", "Apple", 2, base(), false),
        ]);
        assert_eq!(ids(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn test_titles_ignore_case_before_case_tiebreak() {
        let ranked = rank(vec![
            task("banana", "Banana", 2, base(), false),
            task("apple", "apple", 2, base(), false),
            task("Apple", "Apple", 2, base(), false),
            task("cherry", "cherry", 2, base(), false),
        ]);
        assert_eq!(ids(&ranked), vec!["apple", "Apple", "banana", "cherry"]);
        assert_eq!(rank(ranked.clone()), ranked);
    }

    #[test]
    fn test_compare_titles_is_total() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
        assert_eq!(compare_titles("Ärger", "ärger"), Ordering::Greater);
        assert_eq!(compare_titles("app", "apple"), Ordering::Less);
    }

    #[test]
    fn test_completed_sink_below_everything() {
        let ranked = rank(vec![
            task("done-urgent", "A", 1, base() - Duration::days(3), true),
            task("open-lazy", "Z", 5, base() + Duration::days(30), false),
        ]);
        assert_eq!(ids(&ranked), vec!["open-lazy", "done-urgent"]);
    }

    #[test]
    fn test_priority_then_due() {
        let ranked = rank(vec![
            task("p2-early", "x", 2, base(), false),
            task("p1-late", "x", 1, base() + Duration::hours(5), false),
            task("p1-early", "x", 1, base() + Duration::hours(1), false),
        ]);
        assert_eq!(ids(&ranked), vec!["p1-early", "p1-late", "p2-early"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let ranked = rank(vec![
            task("first", "Same", 3, base(), false),
            task("second", "Same", 3, base(), false),
            task("third", "Same", 3, base(), false),
        ]);
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ranked_output_is_ordered_and_idempotent() {
        let titles = ["pear", "Apple", "apple", "kiwi"];
        let mut tasks = Vec::new();
        for i in 0..60i64 {
            tasks.push(task(
                &i.to_string(),
                titles[(i % 4) as usize],
                (i * 7) % 5 + 1,
                base() + Duration::minutes((i * 13) % 9),
                i % 4 == 1,
            ));
        }

        let ranked = rank(tasks.clone());
        assert_eq!(ranked.len(), tasks.len());
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.is_completed <= b.is_completed);
            if a.is_completed == b.is_completed {
                assert!(a.priority <= b.priority);
                if a.priority == b.priority {
                    assert!(a.due_date <= b.due_date);
                    if a.due_date == b.due_date {
                        assert_ne!(compare_titles(&a.title, &b.title), Ordering::Greater);
                    }
                }
            }
        }

        assert_eq!(rank(ranked.clone()), ranked);
    }
}
