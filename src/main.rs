use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taskman::config::Config;
use taskman::manager::TaskManager;
use taskman::model::{Priority, Status};
use taskman::output::Format;
use taskman::query::{SortField, SortOrder};
use taskman::store::JsonStorage;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log filter variable; falls back to `RUST_LOG`.
const LOG_ENV: &str = "TASKMAN_LOG";

#[derive(Parser)]
#[command(name = "task", version, about = "Local task manager backed by a JSON file")]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    format: Format,
    /// Data directory (overrides $TASKMANAGER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short, value_enum, default_value = "medium")]
        priority: Priority,
        #[arg(long, value_enum, default_value = "todo")]
        status: Status,
        /// Due date: YYYY-MM-DD, today, tomorrow, +N or a weekday
        #[arg(long)]
        due: Option<String>,
        /// Tags to attach (comma-separated)
        #[arg(long, short, value_delimiter = ',')]
        tag: Vec<String>,
    },
    /// List tasks
    List {
        /// Status names to include (comma-separated)
        #[arg(long, short, value_delimiter = ',')]
        status: Vec<String>,
        /// Priority names to include (comma-separated)
        #[arg(long, short, value_delimiter = ',')]
        priority: Vec<String>,
        /// Tags to match (comma-separated)
        #[arg(long, short, value_delimiter = ',')]
        tag: Vec<String>,
        /// Require every tag instead of any
        #[arg(long)]
        all_tags: bool,
        /// Only tasks without tags
        #[arg(long)]
        untagged: bool,
        /// Named filter: active, overdue, high_priority, today, this_week, untagged, recent
        #[arg(long)]
        preset: Vec<String>,
        /// Only overdue tasks
        #[arg(long)]
        overdue: bool,
        /// Due on or after this day
        #[arg(long)]
        due_after: Option<String>,
        /// Due on or before this day
        #[arg(long)]
        due_before: Option<String>,
        /// Substring to find in title, description or tags
        #[arg(long)]
        search: Option<String>,
        /// created_at, updated_at, due_date, priority, status or title
        #[arg(long)]
        sort: Option<String>,
        /// asc or desc
        #[arg(long)]
        order: Option<String>,
    },
    /// Show a single task
    Show {
        /// Task ID or unique prefix
        id: String,
    },
    /// Update fields of a task
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short, value_enum)]
        priority: Option<Priority>,
        #[arg(long, short, value_enum)]
        status: Option<Status>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// Replace tags (comma-separated)
        #[arg(long, short, value_delimiter = ',')]
        tag: Option<Vec<String>>,
    },
    /// Mark a task done
    Done {
        id: String,
        /// Move the task back to todo
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Delete { id: String },
    /// Search titles, descriptions, ids and tags
    Search {
        query: String,
        /// Treat the query as a regular expression
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(long, value_enum)]
        sort: Option<SortField>,
        #[arg(long, value_enum)]
        order: Option<SortOrder>,
    },
    /// Unfinished tasks due today or earlier
    Today,
    /// Unfinished tasks past their due date
    Overdue,
    /// Task counts by status and priority
    Stats,
    /// Delete every completed task
    Clear,
    /// Write all tasks to an export file
    Export { path: PathBuf },
    /// Load tasks from an export or tasks file
    Import {
        path: PathBuf,
        /// Keep existing tasks and add only unknown ids
        #[arg(long)]
        merge: bool,
    },
    /// Show where and how tasks are stored
    Info,
}

fn init_tracing() {
    let filter = [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli, format: Format) -> taskman::error::Result<()> {
    let config = match cli.data_dir {
        Some(dir) => Config::with_data_dir(dir),
        None => Config::from_env()?,
    };
    let storage = JsonStorage::from_config(&config)?;

    let open = || -> taskman::error::Result<TaskManager> {
        let manager = TaskManager::with_storage(storage.clone(), config.auto_save)?;
        tracing::debug!(tasks = manager.len(), dir = %storage.data_dir().display(), "loaded tasks");
        Ok(manager)
    };

    match cli.command {
        Commands::Info => taskman::commands::info::run(&storage, format),
        Commands::Add {
            title,
            description,
            priority,
            status,
            due,
            tag,
        } => taskman::commands::create::run(
            &mut open()?,
            title,
            description,
            priority,
            status,
            due,
            tag,
            format,
        ),
        Commands::List {
            status,
            priority,
            tag,
            all_tags,
            untagged,
            preset,
            overdue,
            due_after,
            due_before,
            search,
            sort,
            order,
        } => taskman::commands::list::run(
            &open()?,
            taskman::commands::list::ListArgs {
                statuses: status,
                priorities: priority,
                tags: tag,
                all_tags,
                untagged,
                presets: preset,
                overdue,
                due_after,
                due_before,
                search,
                sort,
                order,
            },
            format,
        ),
        Commands::Show { id } => taskman::commands::show::run(&open()?, &id, format),
        Commands::Update {
            id,
            title,
            description,
            priority,
            status,
            due,
            clear_due,
            tag,
        } => taskman::commands::edit::run(
            &mut open()?,
            &id,
            title,
            description,
            priority,
            status,
            due,
            clear_due,
            tag,
            format,
        ),
        Commands::Done { id, undo } => {
            if undo {
                taskman::commands::lifecycle::reopen(&mut open()?, &id, format)
            } else {
                taskman::commands::lifecycle::done(&mut open()?, &id, format)
            }
        }
        Commands::Delete { id } => taskman::commands::delete::run(&mut open()?, &id, format),
        Commands::Search {
            query,
            regex,
            case_sensitive,
            sort,
            order,
        } => taskman::commands::search::run(
            &open()?,
            &query,
            regex,
            case_sensitive,
            sort,
            order,
            format,
        ),
        Commands::Today => taskman::commands::list::today(&open()?, format),
        Commands::Overdue => taskman::commands::list::overdue(&open()?, format),
        Commands::Stats => taskman::commands::stats::run(&open()?, format),
        Commands::Clear => taskman::commands::lifecycle::clear(&mut open()?, format),
        Commands::Export { path } => {
            taskman::commands::transfer::export(&open()?, &storage, &path, format)
        }
        Commands::Import { path, merge } => {
            taskman::commands::transfer::import(&mut open()?, &storage, &path, merge, format)
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let format = cli.format;
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
