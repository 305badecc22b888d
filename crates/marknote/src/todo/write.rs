use super::{description_input, load, save, IdOptions, Priority};
use crate::config::Config;
use crate::prelude::{eprintln, println, *};
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use marknote_core::todo::{
    apply_update, create_todo, find_mut, parse_due_date, remove, rerender_all, DueDateChange,
    NewTodo, TodoUpdate,
};
use std::path::PathBuf;

fn due_date(input: &str) -> std::result::Result<NaiveDate, String> {
    parse_due_date(input).map_err(|e| e.to_string())
}

/// Create a to-do item
#[derive(Debug, clap::Args)]
pub struct AddOptions {
    /// Item title (at most 200 characters)
    #[arg(long, short = 't')]
    pub title: String,

    /// Description in markdown
    #[arg(long, short = 'd', conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the description from a markdown file (`-` for stdin)
    #[arg(long, value_name = "FILE")]
    pub description_file: Option<PathBuf>,

    /// Priority
    #[arg(long, short = 'p', value_enum, default_value_t = Priority::Medium)]
    pub priority: Priority,

    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = due_date)]
    pub due: Option<NaiveDate>,
}

/// Edit a to-do item; omitted fields are left as they are
#[derive(Debug, clap::Args)]
pub struct EditOptions {
    /// To-do id
    pub id: u64,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description in markdown; an empty string clears it
    #[arg(long, short = 'd', conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the new description from a markdown file (`-` for stdin)
    #[arg(long, value_name = "FILE")]
    pub description_file: Option<PathBuf>,

    /// New priority
    #[arg(long, short = 'p', value_enum)]
    pub priority: Option<Priority>,

    /// New due date (YYYY-MM-DD)
    #[arg(long, value_parser = due_date, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

impl EditOptions {
    fn into_update(self) -> Result<TodoUpdate> {
        let due_date = match (self.due, self.clear_due) {
            (Some(date), _) => DueDateChange::Set(date),
            (None, true) => DueDateChange::Clear,
            (None, false) => DueDateChange::Keep,
        };

        Ok(TodoUpdate {
            title: self.title,
            description: description_input(self.description, self.description_file)?,
            priority: self.priority.map(Into::into),
            due_date,
        })
    }
}

pub fn add(options: AddOptions, config: &Config) -> Result<()> {
    let mut todos = load(config)?;

    let new = NewTodo {
        title: options.title,
        description: description_input(options.description, options.description_file)?
            .unwrap_or_default(),
        priority: options.priority.into(),
        due_date: options.due,
    };

    let todo = create_todo(&todos, new, Utc::now())?;
    let id = todo.id;
    log::info!("created to-do {id}");

    todos.push(todo);
    save(config, &todos)?;

    println!("{} to-do {}", "Created".green(), id);
    Ok(())
}

pub fn edit(options: EditOptions, config: &Config) -> Result<()> {
    let id = options.id;
    let update = options.into_update()?;

    if update.is_empty() {
        return Err(Error::EmptyUpdate.into());
    }

    let mut todos = load(config)?;
    apply_update(find_mut(&mut todos, id)?, update, Utc::now())?;
    save(config, &todos)?;

    println!("{} to-do {}", "Updated".green(), id);
    Ok(())
}

pub fn toggle(options: IdOptions, config: &Config) -> Result<()> {
    let mut todos = load(config)?;
    let completed = marknote_core::todo::toggle(find_mut(&mut todos, options.id)?, Utc::now());
    save(config, &todos)?;

    let state = if completed {
        "done".green()
    } else {
        "pending".yellow()
    };
    println!("To-do {} is now {}", options.id, state);
    Ok(())
}

pub fn delete(options: IdOptions, config: &Config) -> Result<()> {
    let mut todos = load(config)?;
    let removed = remove(&mut todos, options.id)?;
    save(config, &todos)?;

    println!(
        "{} to-do {}: {}",
        "Deleted".red(),
        removed.id,
        removed.title
    );
    Ok(())
}

pub fn rerender(config: &Config) -> Result<()> {
    let mut todos = load(config)?;
    let changed = rerender_all(&mut todos)?;

    if changed > 0 {
        save(config, &todos)?;
    }

    eprintln!(
        "Re-rendered {} descriptions, {} changed",
        todos.len(),
        changed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marknote_core::store::load_records;
    use marknote_core::todo::Todo;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            utc_offset: chrono::FixedOffset::east_opt(9 * 3600).unwrap(),
            verbose: false,
        }
    }

    fn add_options(title: &str, description: &str) -> AddOptions {
        AddOptions {
            title: title.to_string(),
            description: Some(description.to_string()),
            description_file: None,
            priority: Priority::High,
            due: None,
        }
    }

    fn edit_options(id: u64) -> EditOptions {
        EditOptions {
            id,
            title: None,
            description: None,
            description_file: None,
            priority: None,
            due: None,
            clear_due: false,
        }
    }

    #[test]
    fn test_add_edit_toggle_delete() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        add(add_options("Groceries", "- [ ] milk"), &config).unwrap();
        let todos: Vec<Todo> = load_records(&config.todos_path()).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].priority, marknote_core::todo::Priority::High);
        assert!(todos[0].description.html().contains("checkbox"));

        let mut options = edit_options(1);
        options.description = Some("# Done".to_string());
        options.due = Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        edit(options, &config).unwrap();

        toggle(IdOptions { id: 1 }, &config).unwrap();

        let todos: Vec<Todo> = load_records(&config.todos_path()).unwrap();
        assert_eq!(todos[0].description.html(), "<h1>Done</h1>\n");
        assert_eq!(todos[0].due_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(todos[0].completed);

        delete(IdOptions { id: 1 }, &config).unwrap();
        let todos: Vec<Todo> = load_records(&config.todos_path()).unwrap();
        assert!(todos.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_title_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        let err = add(add_options("  ", "body"), &config).unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
        assert!(!config.todos_path().exists());
    }

    #[test]
    fn test_edit_without_fields_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);
        add(add_options("t", ""), &config).unwrap();

        let err = edit(edit_options(1), &config).unwrap_err();
        assert!(err.to_string().starts_with("Nothing to update"));
    }

    #[test]
    fn test_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        let err = toggle(IdOptions { id: 7 }, &config).unwrap_err();
        assert_eq!(err.to_string(), "To-do not found: 7");
    }

    #[test]
    fn test_due_date_value_parser() {
        assert!(due_date("2025-01-31").is_ok());
        assert!(due_date("tomorrow").unwrap_err().contains("YYYY-MM-DD"));
    }
}
