pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tasksched_core::{AppConfig, FileTaskRepository, Priority, TaskService};

use crate::tui::app::{App, InputMode};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(service: TaskService<FileTaskRepository>, cfg: &AppConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service, cfg);
    tracing::info!("tui started");
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("tui exited with error: {err}");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        app.on_tick();
    }
}

/// Returns `false` when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_category(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_category(),
            KeyCode::Char('0') => app.set_priority_filter(None),
            KeyCode::Char(c @ '1'..='5') => {
                let priority = c.to_digit(10).and_then(|d| Priority::new(d as i64).ok());
                app.set_priority_filter(priority);
            }
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('a') => app.enter_add_mode(),
            KeyCode::Char('e') => app.enter_edit_mode(),
            KeyCode::Char('/') => app.enter_search_mode(),
            KeyCode::Char('r') => app.refresh(),
            _ => {}
        },
        InputMode::Adding | InputMode::Editing(_) | InputMode::Searching => match key.code {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.exit_input_mode(),
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            _ => {}
        },
    }
    true
}
