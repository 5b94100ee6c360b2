use chrono::{DateTime, Utc};
use ratatui::widgets::TableState;
use tasksched_core::{
    edit_line, parse_due, select_section, split_input, AppConfig, Bucket, Calendar, Clock, FileTaskRepository,
    Priority, SystemClock, Task, TaskFields, TaskFilter, TaskIntent, TaskSection, TaskService,
    Ticker,
};
use tracing::{debug, warn};

pub enum InputMode {
    Normal,
    Adding,
    Editing(String),
    Searching,
}

pub struct App {
    pub service: TaskService<FileTaskRepository>,
    pub calendar: Calendar,
    pub default_priority: Priority,
    clock: Box<dyn Clock>,
    ticker: Ticker,
    /// Snapshot every visible section was computed against.
    pub now: DateTime<Utc>,
    pub sections: Vec<TaskSection>,
    pub category: Bucket,
    pub priority_filter: Option<Priority>,
    pub search: String,
    pub visible: Vec<Task>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
}

impl App {
    pub fn new(service: TaskService<FileTaskRepository>, cfg: &AppConfig) -> App {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        let now = clock.now();
        let mut ticker = Ticker::new(cfg.tick_interval());
        ticker.reset(now);

        let mut app = App {
            service,
            calendar: cfg.calendar,
            default_priority: cfg.default_priority,
            clock,
            ticker,
            now,
            sections: Vec::new(),
            category: Bucket::default(),
            priority_filter: None,
            search: String::new(),
            visible: Vec::new(),
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
        };
        app.recompute();
        app
    }

    /// Called on every loop iteration; re-classifies once per tick interval.
    pub fn on_tick(&mut self) {
        if let Some(now) = self.ticker.poll(self.clock.now()) {
            debug!(%now, "tick");
            self.now = now;
            self.recompute();
        }
    }

    pub fn refresh(&mut self) {
        self.now = self.clock.now();
        self.ticker.reset(self.now);
        self.recompute();
    }

    fn recompute(&mut self) {
        let filter = TaskFilter::new(Some(self.search.clone()), None);
        self.sections = self.service.sections(self.now, self.calendar, &filter);
        self.visible = select_section(&self.sections, self.category, self.priority_filter);

        let selected = match self.state.selected() {
            _ if self.visible.is_empty() => None,
            Some(i) if i >= self.visible.len() => Some(self.visible.len() - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.state.select(selected);
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        self.sections
            .iter()
            .find(|s| s.bucket == bucket)
            .map_or(0, TaskSection::len)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() { return; }

        let i = match self.state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_category(&mut self) {
        self.shift_category(1);
    }

    pub fn previous_category(&mut self) {
        self.shift_category(Bucket::ALL.len() - 1);
    }

    fn shift_category(&mut self, step: usize) {
        let idx = Bucket::ALL.iter().position(|b| *b == self.category).unwrap_or(0);
        self.select_category(Bucket::ALL[(idx + step) % Bucket::ALL.len()]);
    }

    /// Switching bucket clears the priority chip.
    pub fn select_category(&mut self, bucket: Bucket) {
        self.category = bucket;
        self.priority_filter = None;
        self.state.select(Some(0));
        self.recompute();
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        self.priority_filter = priority;
        self.state.select(Some(0));
        self.recompute();
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.dispatch(TaskIntent::Toggle(id));
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.dispatch(TaskIntent::Delete(id));
        }
    }

    fn dispatch(&mut self, intent: TaskIntent) {
        let now = self.clock.now();
        match self.service.dispatch(intent, now) {
            Ok(task) => self.message = Some(format!("Saved \"{}\"", task.title)),
            Err(e) => {
                warn!("rejected task change: {e}");
                self.message = Some(format!("Error: {e}"));
            }
        }
        self.recompute();
    }

    pub fn enter_add_mode(&mut self) {
        self.start_input(InputMode::Adding, String::new());
    }

    /// Prefills the input line with the selected task's current values.
    pub fn enter_edit_mode(&mut self) {
        if let Some(task) = self.selected_task() {
            let line = edit_line(task, self.calendar);
            let id = task.id.clone();
            self.start_input(InputMode::Editing(id), line);
        }
    }

    pub fn enter_search_mode(&mut self) {
        let current = self.search.clone();
        self.start_input(InputMode::Searching, current);
    }

    fn start_input(&mut self, mode: InputMode, initial: String) {
        self.cursor_position = initial.chars().count();
        self.input = initial;
        self.input_mode = mode;
        self.message = None;
    }

    pub fn exit_input_mode(&mut self) {
        if matches!(self.input_mode, InputMode::Searching) {
            self.search.clear();
            self.recompute();
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
        self.on_input_changed();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
            self.on_input_changed();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    // search filters live while typing
    fn on_input_changed(&mut self) {
        if matches!(self.input_mode, InputMode::Searching) {
            self.search = self.input.clone();
            self.recompute();
        }
    }

    pub fn submit_input(&mut self) {
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
        match mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing(id) => self.submit_edit(id),
            InputMode::Searching | InputMode::Normal => {}
        }
        self.input.clear();
        self.cursor_position = 0;
    }

    fn submit_add(&mut self) {
        let now = self.clock.now();
        let args = split_input(&self.input);
        let draft = TaskFields::parse(&args, now, self.calendar).and_then(|fields| {
            let default_due = parse_due("today", now, self.calendar)?;
            Ok(fields.into_create_draft(self.default_priority, default_due))
        });
        match draft {
            Ok(draft) => self.dispatch(TaskIntent::Create(draft)),
            Err(e) => self.message = Some(format!("Error: {e}")),
        }
    }

    fn submit_edit(&mut self, id: String) {
        let Some(task) = self.service.find(&id) else {
            self.message = Some(format!("Error: task {id} no longer exists"));
            return;
        };
        let now = self.clock.now();
        let args = split_input(&self.input);
        match TaskFields::parse(&args, now, self.calendar) {
            Ok(fields) => {
                let draft = fields.into_replacement_draft(task);
                self.dispatch(TaskIntent::Update { id, draft });
            }
            Err(e) => self.message = Some(format!("Error: {e}")),
        }
    }
}
