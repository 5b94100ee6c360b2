use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::error::TaskError;
use crate::model::intent::TaskDraft;
use crate::model::task::{Priority, Task};
use crate::time::{parse_due, Calendar};

pub const KNOWN_KEYS: [&str; 3] = ["due", "priority", "note"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub title: String,
    pub metadata: HashMap<String, String>,
}

/// Splits words into a title and `key:value` metadata.
///
/// Only keys that expand to one of [`KNOWN_KEYS`] are treated as metadata,
/// so words like `10:30` stay part of the title.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut title_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if let Ok(full_key) = expand_key(key, &KNOWN_KEYS) {
                metadata.insert(full_key, value.to_string());
                continue;
            }
        }
        title_parts.push(arg.as_str());
    }

    ParsedInput {
        title: title_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if key.is_empty() {
        return Err(anyhow!("Empty key"));
    }
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Whitespace tokenizer for the TUI input line; double quotes group words,
/// so `note:"call them back"` stays one token.
pub fn split_input(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Field values read from command words; absent fields stay `None`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskFields {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub due: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl TaskFields {
    pub fn parse(args: &[String], now: DateTime<Utc>, calendar: Calendar) -> Result<Self, TaskError> {
        let parsed = parse_args(args);
        let mut fields = TaskFields {
            title: Some(parsed.title).filter(|t| !t.trim().is_empty()),
            ..Default::default()
        };

        for (key, value) in parsed.metadata {
            match key.as_str() {
                "due" => fields.due = Some(parse_due(&value, now, calendar)?),
                "priority" => fields.priority = Some(value.parse()?),
                "note" => fields.note = Some(value),
                _ => {}
            }
        }
        Ok(fields)
    }

    pub fn into_create_draft(self, default_priority: Priority, default_due: DateTime<Utc>) -> TaskDraft {
        TaskDraft {
            title: self.title.unwrap_or_default(),
            priority: self.priority.unwrap_or(default_priority),
            due_date: self.due.unwrap_or(default_due),
            note: self.note,
        }
    }

    /// Treats the words as the task's complete new contents, as produced by
    /// editing an [`edit_line`]: a missing `note:` clears the note and a
    /// missing title is rejected on apply. Priority and due fall back to the
    /// task's current values.
    pub fn into_replacement_draft(self, task: &Task) -> TaskDraft {
        TaskDraft {
            title: self.title.unwrap_or_default(),
            priority: self.priority.unwrap_or(task.priority),
            due_date: self.due.unwrap_or(task.due_date),
            note: self.note,
        }
    }

    /// Overlays the given fields on an existing task.
    pub fn into_edit_draft(self, task: &Task) -> TaskDraft {
        TaskDraft {
            title: self.title.unwrap_or_else(|| task.title.clone()),
            priority: self.priority.unwrap_or(task.priority),
            due_date: self.due.unwrap_or(task.due_date),
            note: self.note.or_else(|| task.note.clone()),
        }
    }
}

/// Renders a task as an editable input line that parses back to the same
/// values. The due instant is written as an exact RFC 3339 timestamp so an
/// untouched edit never moves it.
pub fn edit_line(task: &Task, calendar: Calendar) -> String {
    let mut line = format!(
        "{} p:{} due:\"{}\"",
        task.title,
        task.priority.value(),
        calendar.format(task.due_date, "%Y-%m-%dT%H:%M:%S%.f%:z")
    );
    if let Some(note) = &task.note {
        line.push_str(&format!(" note:\"{}\"", note));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn words(s: &[&str]) -> Vec<String> {
        s.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&words(&["Buy", "milk", "due:tomorrow", "pri:2"]));
        assert_eq!(parsed.title, "Buy milk");
        assert_eq!(parsed.metadata.get("due"), Some(&"tomorrow".to_string()));
        assert_eq!(parsed.metadata.get("priority"), Some(&"2".to_string()));
    }

    #[test]
    fn test_clock_times_stay_in_title() {
        let parsed = parse_args(&words(&["Standup", "10:30"]));
        assert_eq!(parsed.title, "Standup 10:30");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("d", &KNOWN_KEYS).unwrap(), "due");
        assert_eq!(expand_key("p", &KNOWN_KEYS).unwrap(), "priority");
        assert_eq!(expand_key("note", &KNOWN_KEYS).unwrap(), "note");
        assert!(expand_key("x", &KNOWN_KEYS).is_err());
        assert!(expand_key("", &KNOWN_KEYS).is_err());
        assert!(expand_key("pr", &["project", "priority"]).is_err());
    }

    #[test]
    fn test_split_input_quotes() {
        assert_eq!(
            split_input(r#"Call  plumber note:"ask about the boiler" p:1"#),
            words(&["Call", "plumber", "note:ask about the boiler", "p:1"])
        );
        assert!(split_input("   ").is_empty());
    }

    #[test]
    fn test_fields_to_drafts() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let fields = TaskFields::parse(&words(&["Pay", "rent", "p:2", "due:tom"]), now, Calendar::Utc).unwrap();
        let draft = fields.into_create_draft(Priority::default(), now);
        assert_eq!(draft.title, "Pay rent");
        assert_eq!(draft.priority.value(), 2);
        assert_eq!(draft.due_date, Utc.with_ymd_and_hms(2025, 6, 11, 23, 59, 59).unwrap());

        let existing = Task::new("Old".to_string(), Priority::LOWEST, now, Some("keep".to_string()));
        let edit = TaskFields::parse(&words(&["p:1"]), now, Calendar::Utc)
            .unwrap()
            .into_edit_draft(&existing);
        assert_eq!(edit.title, "Old");
        assert_eq!(edit.priority, Priority::HIGHEST);
        assert_eq!(edit.note.as_deref(), Some("keep"));

        assert!(TaskFields::parse(&words(&["x", "p:9"]), now, Calendar::Utc).is_err());
        assert!(TaskFields::parse(&words(&["x", "due:+100000000d"]), now, Calendar::Utc).is_err());
        assert!(TaskFields::parse(&words(&["x", "due:someday"]), now, Calendar::Utc).is_err());
    }

    fn edited(task: &Task, calendar: Calendar, line: &str) -> TaskDraft {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        TaskFields::parse(&split_input(line), now, calendar)
            .unwrap()
            .into_replacement_draft(task)
    }

    #[test]
    fn test_untouched_edit_line_keeps_due_exactly() {
        let due = Utc.with_ymd_and_hms(2025, 6, 10, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(250);
        let task = Task::new("Pay rent".to_string(), Priority::new(2).unwrap(), due, Some("cash".to_string()));

        for calendar in [Calendar::Utc, "+09:00".parse().unwrap(), "-03:30".parse().unwrap()] {
            let line = edit_line(&task, calendar);
            let draft = edited(&task, calendar, &line);
            assert_eq!(draft.due_date, task.due_date, "{line}");
            assert_eq!(draft.title, "Pay rent");
            assert_eq!(draft.priority, task.priority);
            assert_eq!(draft.note.as_deref(), Some("cash"));
        }
    }

    #[test]
    fn test_retitled_edit_line_keeps_due() {
        let due = Utc.with_ymd_and_hms(2025, 6, 10, 23, 59, 59).unwrap();
        let task = Task::new("Pay rent".to_string(), Priority::new(2).unwrap(), due, None);

        let line = edit_line(&task, Calendar::Utc).replacen("Pay rent", "Pay June rent", 1);
        let draft = edited(&task, Calendar::Utc, &line);
        assert_eq!(draft.title, "Pay June rent");
        assert_eq!(draft.due_date, due);
    }

    #[test]
    fn test_removing_note_token_clears_note() {
        let due = Utc.with_ymd_and_hms(2025, 6, 10, 23, 59, 59).unwrap();
        let task = Task::new("Dentist".to_string(), Priority::HIGHEST, due, Some("bring x-rays".to_string()));

        let line = edit_line(&task, Calendar::Utc);
        let without_note = line.split(" note:").next().unwrap().to_string();
        assert_eq!(edited(&task, Calendar::Utc, &without_note).note, None);

        // the overlay used by `tasksched edit` keeps what was not mentioned
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let overlay = TaskFields::parse(&words(&["p:3"]), now, Calendar::Utc)
            .unwrap()
            .into_edit_draft(&task);
        assert_eq!(overlay.note.as_deref(), Some("bring x-rays"));
    }
}
