use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use tasksched_core::{Bucket, Priority};

use crate::list::status_icon;
use crate::tui::app::{App, InputMode};

pub fn priority_color(priority: Priority) -> Color {
    match priority.value() {
        1 => Color::Rgb(231, 76, 60),
        2 => Color::Rgb(230, 126, 34),
        3 => Color::Rgb(241, 196, 15),
        4 => Color::Rgb(52, 152, 219),
        _ => Color::Rgb(46, 204, 113),
    }
}

fn bucket_color(bucket: Bucket) -> Color {
    match bucket {
        Bucket::Overdue => Color::Rgb(211, 47, 47),
        Bucket::Today => Color::Rgb(25, 118, 210),
        Bucket::Tomorrow => Color::Rgb(245, 124, 0),
        Bucket::Upcoming => Color::Rgb(56, 142, 60),
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Category cards
            Constraint::Length(1), // Priority chips
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Input / help
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);
    draw_cards(f, app, main_chunks[1]);
    draw_chips(f, app, main_chunks[2]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[3]);

    draw_task_list(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);
    draw_footer(f, app, main_chunks[4]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("TASK SCHEDULER", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("   {}", app.calendar.format(app.now, "%a %Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !app.search.is_empty() {
        spans.push(Span::styled(format!("   search: {}", app.search), Style::default().fg(Color::Yellow)));
    }
    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, area);
}

// Only non-empty buckets get a card.
fn draw_cards(f: &mut Frame, app: &App, area: Rect) {
    if app.sections.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = app
        .sections
        .iter()
        .map(|_| Constraint::Ratio(1, app.sections.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (section, cell) in app.sections.iter().zip(cells.iter()) {
        let color = bucket_color(section.bucket);
        let selected = section.bucket == app.category;
        let count = section.len();
        let noun = if count == 1 { "Task" } else { "Tasks" };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
            .border_style(if selected { Style::default().fg(color) } else { Style::default().fg(Color::DarkGray) })
            .title(Span::styled(
                format!(" {} ", section.bucket),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        let body = Paragraph::new(format!("{} {}", count, noun))
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(body, *cell);
    }
}

fn draw_chips(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![chip("All", app.priority_filter.is_none(), Color::White)];
    for p in Priority::ALL {
        spans.push(Span::raw(" "));
        spans.push(chip(&p.to_string(), app.priority_filter == Some(p), priority_color(p)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn chip(label: &str, selected: bool, color: Color) -> Span<'static> {
    let text = format!(" {} ", label);
    if selected {
        Span::styled(text, Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(text, Style::default().fg(color))
    }
}

fn draw_task_list(f: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(" {} Tasks ", app.category);

    if app.visible.is_empty() {
        let text = match app.priority_filter {
            Some(p) => format!("No {} tasks", p),
            None => format!("No tasks in \"{}\"", app.category),
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app.visible.iter().map(|task| {
        let title_style = if task.is_completed {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        Row::new(vec![
            Span::raw(status_icon(task)),
            Span::styled(task.priority.to_string(), Style::default().fg(priority_color(task.priority))),
            Span::raw(app.calendar.format(task.due_date, "%m-%d %H:%M")),
            Span::styled(task.title.clone(), title_style),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(3),  // Priority
            Constraint::Length(12), // Due
            Constraint::Min(10),    // Title
        ]
    )
    .header(Row::new(vec!["St", "Pr", "Due", "Task"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);

    let Some(task) = app.selected_task() else {
        f.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(Color::Blue);
    let mut detail_text = vec![
        Line::from(vec![
            Span::styled("Title: ", label),
            Span::styled(&task.title, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Status: ", label),
            Span::raw(if task.is_completed { "Completed" } else { "Pending" }),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", label),
            Span::styled(task.priority.to_string(), Style::default().fg(priority_color(task.priority))),
        ]),
        Line::from(vec![
            Span::styled("Due: ", label),
            Span::raw(app.calendar.format(task.due_date, "%a %Y-%m-%d %H:%M")),
        ]),
        Line::from(""),
    ];

    if let Some(note) = &task.note {
        detail_text.push(Line::from(Span::styled("Note:", label)));
        detail_text.push(Line::from(note.as_str()));
    }

    let detail = Paragraph::new(detail_text).block(block).wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let prompt = match &app.input_mode {
        InputMode::Normal => None,
        InputMode::Adding => Some("add> "),
        InputMode::Editing(_) => Some("edit (drop note:\"..\" to clear it)> "),
        InputMode::Searching => Some("search> "),
    };

    match prompt {
        Some(prompt) => {
            let line = Line::from(vec![
                Span::styled(prompt, Style::default().fg(Color::Cyan)),
                Span::raw(app.input.as_str()),
            ]);
            f.render_widget(Paragraph::new(line), area);
            let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
            let x = area.x + (prompt.len() + unicode_width::UnicodeWidthStr::width(before_cursor.as_str())) as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
        None => {
            let help = app.message.clone().unwrap_or_else(|| {
                "j/k: move | tab: category | 0-5: priority | a: add | e: edit | space: done | d: delete | /: search | r: refresh | q: quit".to_string()
            });
            let footer = Paragraph::new(help)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(footer, area);
        }
    }
}
