mod list;
mod write;

use crate::config::Config;
use crate::prelude::{eprintln, *};
use colored::Colorize;
use marknote_core::store::{load_records, save_records};
use marknote_core::todo::Todo;
use std::path::PathBuf;

pub use list::{ListOptions, ShowOptions};
pub use write::{AddOptions, EditOptions};

#[derive(Debug, Clone, Copy, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl From<Priority> for marknote_core::todo::Priority {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Low => marknote_core::todo::Priority::Low,
            Priority::Medium => marknote_core::todo::Priority::Medium,
            Priority::High => marknote_core::todo::Priority::High,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every item (default)
    #[default]
    All,
    /// Items not yet completed
    Pending,
    /// Completed items
    Done,
}

impl From<Status> for marknote_core::todo::StatusFilter {
    fn from(s: Status) -> Self {
        match s {
            Status::All => marknote_core::todo::StatusFilter::All,
            Status::Pending => marknote_core::todo::StatusFilter::Pending,
            Status::Done => marknote_core::todo::StatusFilter::Done,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(name = "todo")]
#[command(about = "To-do items with markdown descriptions")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Create a new to-do item
    #[clap(name = "add")]
    Add(AddOptions),

    /// List to-do items, newest first
    #[clap(name = "list")]
    List(ListOptions),

    /// Show a single to-do item
    #[clap(name = "show")]
    Show(ShowOptions),

    /// Edit the fields of a to-do item
    #[clap(name = "edit")]
    Edit(EditOptions),

    /// Flip the completed flag of a to-do item
    #[clap(name = "toggle")]
    Toggle(IdOptions),

    /// Delete a to-do item
    #[clap(name = "delete")]
    Delete(IdOptions),

    /// Recompute the stored HTML of every description
    #[clap(name = "rerender")]
    Rerender,
}

#[derive(Debug, clap::Args)]
pub struct IdOptions {
    /// To-do id
    pub id: u64,
}

pub fn run(app: App, config: &Config) -> Result<()> {
    if config.verbose {
        eprintln!("Using {}", config.todos_path().display());
    }

    match app.command {
        Commands::Add(options) => write::add(options, config),
        Commands::List(options) => list::list(options, config),
        Commands::Show(options) => list::show(options, config),
        Commands::Edit(options) => write::edit(options, config),
        Commands::Toggle(options) => write::toggle(options, config),
        Commands::Delete(options) => write::delete(options, config),
        Commands::Rerender => write::rerender(config),
    }
}

fn load(config: &Config) -> Result<Vec<Todo>> {
    Ok(load_records(&config.todos_path())?)
}

fn save(config: &Config, todos: &[Todo]) -> Result<()> {
    Ok(save_records(&config.todos_path(), todos)?)
}

/// Pick the description from `--description` or `--description-file`
fn description_input(text: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
    match (text, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(file)) => crate::render::read_input(Some(&file)).map(Some),
        (None, None) => Ok(None),
    }
}

fn colored_priority(priority: marknote_core::todo::Priority) -> String {
    use marknote_core::todo::Priority;

    match priority {
        Priority::High => priority.as_str().red().bold().to_string(),
        Priority::Medium => priority.as_str().yellow().to_string(),
        Priority::Low => priority.as_str().bright_black().to_string(),
    }
}

fn status_mark(todo: &Todo) -> String {
    if todo.completed {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    }
}
