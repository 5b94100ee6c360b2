use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc,
    Weekday,
};
use serde::Deserialize;

use crate::error::TaskError;

/// Calendar used to decide which day an instant falls on.
///
/// Comparisons are made on the resolved calendar date, so a daylight-saving
/// transition changes the wall-clock hour of a task but never its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Calendar {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Calendar {
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Calendar::Local => instant.with_timezone(&Local).date_naive(),
            Calendar::Utc => instant.date_naive(),
            Calendar::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// Maps a wall-clock time in this calendar to an instant. Times skipped
    /// by a DST gap resolve to `None`; ambiguous ones take the earlier instant.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Calendar::Local => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Calendar::Utc => Some(local.and_utc()),
            Calendar::Fixed(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Formats an instant as wall-clock time in this calendar.
    pub fn format(&self, instant: DateTime<Utc>, fmt: &str) -> String {
        match self {
            Calendar::Local => instant.with_timezone(&Local).format(fmt).to_string(),
            Calendar::Utc => instant.format(fmt).to_string(),
            Calendar::Fixed(offset) => instant.with_timezone(offset).format(fmt).to_string(),
        }
    }
}

impl FromStr for Calendar {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "local" => return Ok(Calendar::Local),
            "utc" | "z" => return Ok(Calendar::Utc),
            _ => {}
        }
        parse_offset(trimmed)
            .map(Calendar::Fixed)
            .ok_or_else(|| TaskError::InvalidCalendar(s.to_string()))
    }
}

impl TryFrom<String> for Calendar {
    type Error = TaskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calendar::Local => f.write_str("local"),
            Calendar::Utc => f.write_str("utc"),
            Calendar::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

// "+09:00", "-0530"
fn parse_offset(input: &str) -> Option<FixedOffset> {
    let sign = match input.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let digits: String = input[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses human due-date input relative to `now`.
///
/// Keyword and date-only forms resolve to 23:59:59 of the target day in
/// `calendar`; `+Nh` / `+Nm` are offsets from `now`.
pub fn parse_due(input: &str, now: DateTime<Utc>, calendar: Calendar) -> Result<DateTime<Utc>, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::InvalidDueDate(input.to_string()));
    }
    let today = calendar.day_of(now);

    match input.to_lowercase().as_str() {
        "today" | "tod" => return end_of_day(today, calendar),
        "tomorrow" | "tom" => {
            let tomorrow = today.succ_opt().ok_or_else(|| TaskError::InvalidDueDate(input.to_string()))?;
            return end_of_day(tomorrow, calendar);
        }
        _ => {}
    }

    if let Some(body) = input.strip_prefix('+') {
        return parse_relative(body, now, today, calendar)
            .ok_or_else(|| TaskError::InvalidDueDate(input.to_string()));
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Some(target) = parse_weekday_str(day_str) {
            let mut days_needed = target.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // 1:fri is the next Friday, 2:fri the one after it
            let target_day = (count.max(1) - 1)
                .checked_mul(7)
                .and_then(|extra| extra.checked_add(days_needed))
                .and_then(Duration::try_days)
                .and_then(|offset| today.checked_add_signed(offset))
                .ok_or_else(|| TaskError::InvalidDueDate(input.to_string()))?;
            return end_of_day(target_day, calendar);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return calendar
                .resolve(naive)
                .ok_or_else(|| TaskError::InvalidDueDate(input.to_string()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(date, calendar);
    }

    Err(TaskError::InvalidDueDate(input.to_string()))
}

// None for unknown units and for offsets outside chrono's range
fn parse_relative(body: &str, now: DateTime<Utc>, today: NaiveDate, calendar: Calendar) -> Option<DateTime<Utc>> {
    let unit = body.chars().last()?;
    let count: i64 = body[..body.len() - unit.len_utf8()].parse().ok()?;
    match unit.to_ascii_lowercase() {
        'd' => end_of_day(today.checked_add_signed(Duration::try_days(count)?)?, calendar).ok(),
        'w' => end_of_day(today.checked_add_signed(Duration::try_weeks(count)?)?, calendar).ok(),
        'h' => now.checked_add_signed(Duration::try_hours(count)?),
        'm' => now.checked_add_signed(Duration::try_minutes(count)?),
        _ => None,
    }
}

fn end_of_day(date: NaiveDate, calendar: Calendar) -> Result<DateTime<Utc>, TaskError> {
    date.and_hms_opt(23, 59, 59)
        .and_then(|local| calendar.resolve(local))
        .ok_or_else(|| TaskError::InvalidDueDate(date.to_string()))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|c| (c, day)),
        // plain "fri" means 1:fri
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
