mod list;
mod logging;
mod tui;

use anyhow::{anyhow, Result};
use clap::Parser;
use tasksched_core::{
    bucket_for, parse_due, AppConfig, Bucket, Clock, FileTaskRepository, Priority, SystemClock,
    TaskFields, TaskFilter, TaskIntent, TaskService,
};

#[derive(Parser)]
#[command(name = "tasksched")]
#[command(about = "Personal task scheduler: overdue, today, tomorrow and upcoming at a glance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task (usage: add Pay rent due:tom priority:2 note:"ask for receipt")
    Add {
        /// Title words plus key:value metadata (due, priority, note)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Change a task's title or metadata
    ///
    /// Only the given fields change; `note:""` clears the note.
    Edit {
        /// Task id or a unique prefix of it
        id: String,
        /// New title words plus key:value metadata (due, priority, note)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Toggle a task between pending and completed
    Done { id: String },
    /// Delete a task
    #[command(alias = "delete")]
    Rm { id: String },
    /// List tasks grouped by due bucket
    List {
        /// Only show one bucket (overdue, today, tomorrow, upcoming)
        #[arg(short, long)]
        category: Option<Bucket>,
        /// Only show one priority (1-5)
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single task
    Show { id: String },
    /// Open the Terminal User Interface
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load()?;
    let command = cli.command.unwrap_or(Commands::Tui);

    let _log_guard = match command {
        Commands::Tui => Some(logging::init_file(&cfg.log_level)?),
        _ => {
            logging::init_stderr(&cfg.log_level);
            None
        }
    };

    let repo = FileTaskRepository::new(cfg.data_dir.clone())?;
    let mut service = TaskService::load(repo);
    let calendar = cfg.calendar;
    let now = SystemClock.now();

    match command {
        Commands::Add { args } => {
            let fields = TaskFields::parse(&args, now, calendar)?;
            if fields.title.is_none() {
                return Err(anyhow!("Task title is required."));
            }
            let default_due = parse_due("today", now, calendar)?;
            let draft = fields.into_create_draft(cfg.default_priority, default_due);
            let task = service.dispatch(TaskIntent::Create(draft), now)?;

            println!("Task added: {} (ID: {})", task.title, task.short_id());
            println!("  Due: {}", calendar.format(task.due_date, "%a %Y-%m-%d %H:%M"));
            println!("  Priority: {}", task.priority);
        }
        Commands::Edit { id, args } => {
            let id = service.resolve_id(&id)?;
            let fields = TaskFields::parse(&args, now, calendar)?;
            let current = service.find(&id).ok_or_else(|| anyhow!("Task {} not found", id))?;
            let draft = fields.into_edit_draft(current);
            let task = service.dispatch(TaskIntent::Update { id, draft }, now)?;
            println!("Task updated: {} (ID: {})", task.title, task.short_id());
        }
        Commands::Done { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.dispatch(TaskIntent::Toggle(id), now)?;
            let state = if task.is_completed { "completed" } else { "pending" };
            println!("{} is now {}.", task.title, state);
        }
        Commands::Rm { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.dispatch(TaskIntent::Delete(id), now)?;
            println!("Deleted: {}", task.title);
        }
        Commands::List { category, priority, search } => {
            let sections = service.sections(now, calendar, &TaskFilter::new(search, None));
            list::print_sections(&sections, calendar, category, priority);
        }
        Commands::Show { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.find(&id).ok_or_else(|| anyhow!("Task {} not found", id))?;
            let bucket = bucket_for(task, now, calendar.day_of(now), calendar);
            list::print_detail(task, bucket, calendar);
        }
        Commands::Tui => {
            tui::run(service, &cfg)?;
        }
    }
    Ok(())
}
