use tabled::settings::object::Rows;
use tabled::settings::{Color, Style};
use tabled::{Table, Tabled};
use tasksched_core::{select_section, Bucket, Calendar, Priority, Task, TaskSection};
use unicode_width::UnicodeWidthChar;

const TITLE_WIDTH: usize = 40;
const NOTE_WIDTH: usize = 30;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "St")]
    status: &'static str,
    #[tabled(rename = "Pri")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl TaskRow {
    fn new(task: &Task, calendar: Calendar) -> Self {
        Self {
            id: task.short_id().to_string(),
            status: status_icon(task),
            priority: task.priority.to_string(),
            due: calendar.format(task.due_date, "%Y-%m-%d %H:%M"),
            title: truncate(&task.title, TITLE_WIDTH),
            note: task.note.as_deref().map(|n| truncate(n, NOTE_WIDTH)).unwrap_or_default(),
        }
    }
}

pub fn status_icon(task: &Task) -> &'static str {
    if task.is_completed {
        "✔"
    } else {
        "☐"
    }
}

/// Prints every non-empty section, or only `focus` when given.
pub fn print_sections(
    sections: &[TaskSection],
    calendar: Calendar,
    focus: Option<Bucket>,
    priority: Option<Priority>,
) {
    let buckets: Vec<Bucket> = match focus {
        Some(bucket) => vec![bucket],
        None => sections.iter().map(|s| s.bucket).collect(),
    };

    let mut printed = 0;
    for bucket in buckets {
        let tasks = select_section(sections, bucket, priority);
        if tasks.is_empty() {
            continue;
        }
        print_table(bucket, &tasks, calendar);
        printed += 1;
    }

    if printed == 0 {
        match (focus, priority) {
            (_, Some(p)) => println!("No {} tasks.", p),
            (Some(bucket), None) => println!("No tasks in \"{}\".", bucket),
            (None, None) => println!("No tasks found."),
        }
    }
}

fn print_table(bucket: Bucket, tasks: &[Task], calendar: Calendar) {
    let noun = if tasks.len() == 1 { "Task" } else { "Tasks" };
    println!("\n\x1b[1;36m{}\x1b[0m ({} {})", bucket, tasks.len(), noun);

    let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::new(t, calendar)).collect();
    let mut table = Table::new(rows);
    table.with(Style::modern()).modify(Rows::first(), Color::FG_CYAN);
    println!("{}", table);
}

pub fn print_detail(task: &Task, bucket: Bucket, calendar: Calendar) {
    println!("Title:    {}", task.title);
    println!("ID:       {}", task.id);
    println!("Status:   {}", if task.is_completed { "Completed" } else { "Pending" });
    println!("Priority: {}", task.priority);
    println!("Due:      {} ({})", calendar.format(task.due_date, "%a %Y-%m-%d %H:%M"), bucket);
    if let Some(note) = &task.note {
        println!("Note:     {}", note);
    }
}

/// Cuts `s` to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    let total: usize = s.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_columns() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        // wide characters take two columns each
        assert_eq!(truncate("買い物リスト", 7), "買い物…");
    }
}
