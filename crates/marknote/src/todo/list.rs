use super::{colored_priority, load, status_mark, Status};
use crate::config::Config;
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use marknote_core::todo::{filter_by_status, find, sort_newest_first, summarize, Todo};
use prettytable::row;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// List to-do items
#[derive(Debug, clap::Args)]
pub struct ListOptions {
    /// Which items to show
    #[arg(long, value_enum, default_value_t = Status::All)]
    pub status: Status,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show one to-do item
#[derive(Debug, clap::Args)]
pub struct ShowOptions {
    /// To-do id
    pub id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the markdown source instead of the rendered HTML
    #[arg(long)]
    pub source: bool,
}

pub fn list(options: ListOptions, config: &Config) -> Result<()> {
    let mut todos = load(config)?;
    sort_newest_first(&mut todos);

    let visible = filter_by_status(&todos, options.status.into());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        eprintln!("No to-do items");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(row![
        "ID".bold().cyan(),
        "".bold().cyan(),
        "TITLE".bold().cyan(),
        "PRIORITY".bold().cyan(),
        "DUE".bold().cyan(),
        "CREATED".bold().cyan()
    ]);

    for todo in &visible {
        table.add_row(row![
            todo.id,
            status_mark(todo),
            todo.title,
            colored_priority(todo.priority),
            todo.due_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
            todo.created_at_in(config.utc_offset).format(TIME_FORMAT)
        ]);
    }

    table.printstd();

    let summary = summarize(&todos);
    eprintln!(
        "\n{} total, {} pending, {} done",
        summary.total, summary.pending, summary.done
    );

    Ok(())
}

pub fn show(options: ShowOptions, config: &Config) -> Result<()> {
    let todos = load(config)?;
    let todo = find(&todos, options.id)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(todo)?);
        return Ok(());
    }

    display_todo(todo, config, options.source);
    Ok(())
}

fn display_todo(todo: &Todo, config: &Config, source: bool) {
    println!(
        "\n{} {} {}\n",
        format!("#{}", todo.id).bold().cyan(),
        status_mark(todo),
        todo.title.bright_white()
    );

    let mut table = new_table();
    table.add_row(row![
        "Priority".bold().cyan(),
        colored_priority(todo.priority)
    ]);
    if let Some(due) = todo.due_date {
        table.add_row(row!["Due".bold().cyan(), due]);
    }
    table.add_row(row![
        "Created".bold().cyan(),
        todo.created_at_in(config.utc_offset).format(TIME_FORMAT)
    ]);
    table.add_row(row![
        "Updated".bold().cyan(),
        todo.updated_at_in(config.utc_offset).format(TIME_FORMAT)
    ]);
    table.printstd();

    if todo.description.is_empty() {
        return;
    }

    println!();
    if source {
        println!("{}", todo.description.source());
    } else {
        print!("{}", todo.description.html());
    }
}
