//! To-do items and their transformations
//!
//! Every function here is pure: records come in as slices, the current time comes in
//! as `now`, and the caller decides when to persist.

use crate::block::ContentBlock;
use crate::markdown::RenderError;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum title length, in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Date format accepted for due dates
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Title must be at most 200 characters (got {0})")]
    TitleTooLong(usize),

    #[error("Invalid due date '{0}': expected YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("Invalid priority '{0}': expected low, medium or high")]
    InvalidPriority(String),

    #[error("To-do not found: {0}")]
    NotFound(u64),

    #[error("No free to-do id left")]
    IdOverflow,

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(TodoError::InvalidPriority(s.to_string())),
        }
    }
}

/// Which items a listing shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !todo.completed,
            StatusFilter::Done => todo.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: ContentBlock,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn created_at_in(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        self.created_at.with_timezone(&offset)
    }

    pub fn updated_at_in(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        self.updated_at.with_timezone(&offset)
    }
}

/// Input for [`create_todo`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueDateChange {
    #[default]
    Keep,
    Set(NaiveDate),
    Clear,
}

/// Input for [`apply_update`]; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: DueDateChange,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date == DueDateChange::Keep
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoSummary {
    pub total: usize,
    pub pending: usize,
    pub done: usize,
}

/// Trim and check a title
pub fn validate_title(title: &str) -> Result<String, TodoError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(TodoError::EmptyTitle);
    }

    let length = title.chars().count();
    if length > MAX_TITLE_CHARS {
        return Err(TodoError::TitleTooLong(length));
    }

    Ok(title.to_string())
}

pub fn parse_due_date(input: &str) -> Result<NaiveDate, TodoError> {
    NaiveDate::parse_from_str(input.trim(), DUE_DATE_FORMAT)
        .map_err(|_| TodoError::InvalidDueDate(input.to_string()))
}

fn next_id(todos: &[Todo]) -> Result<u64, TodoError> {
    let last = todos.iter().map(|todo| todo.id).max().unwrap_or(0);
    last.checked_add(1).ok_or(TodoError::IdOverflow)
}

/// Validate and build a new item with the next free id
pub fn create_todo(existing: &[Todo], new: NewTodo, now: DateTime<Utc>) -> Result<Todo, TodoError> {
    let title = validate_title(&new.title)?;
    let description = ContentBlock::new(new.description)?;

    Ok(Todo {
        id: next_id(existing)?,
        title,
        description,
        completed: false,
        priority: new.priority,
        due_date: new.due_date,
        created_at: now,
        updated_at: now,
    })
}

/// Apply an edit; the item is unchanged if any part of it is invalid
///
/// A new description always replaces the stored HTML, including an empty one.
pub fn apply_update(
    todo: &mut Todo,
    update: TodoUpdate,
    now: DateTime<Utc>,
) -> Result<(), TodoError> {
    let title = update.title.as_deref().map(validate_title).transpose()?;
    let description = update.description.map(ContentBlock::new).transpose()?;

    if let Some(title) = title {
        todo.title = title;
    }
    if let Some(description) = description {
        todo.description = description;
    }
    if let Some(priority) = update.priority {
        todo.priority = priority;
    }
    match update.due_date {
        DueDateChange::Keep => {}
        DueDateChange::Set(date) => todo.due_date = Some(date),
        DueDateChange::Clear => todo.due_date = None,
    }

    todo.updated_at = now;
    Ok(())
}

/// Flip the completed flag; returns the new state
pub fn toggle(todo: &mut Todo, now: DateTime<Utc>) -> bool {
    todo.completed = !todo.completed;
    todo.updated_at = now;
    todo.completed
}

pub fn find(todos: &[Todo], id: u64) -> Result<&Todo, TodoError> {
    todos
        .iter()
        .find(|todo| todo.id == id)
        .ok_or(TodoError::NotFound(id))
}

pub fn find_mut(todos: &mut [Todo], id: u64) -> Result<&mut Todo, TodoError> {
    todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or(TodoError::NotFound(id))
}

pub fn remove(todos: &mut Vec<Todo>, id: u64) -> Result<Todo, TodoError> {
    let index = todos
        .iter()
        .position(|todo| todo.id == id)
        .ok_or(TodoError::NotFound(id))?;

    Ok(todos.remove(index))
}

/// Newest first; equal timestamps fall back to the higher id
pub fn sort_newest_first(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

pub fn filter_by_status(todos: &[Todo], filter: StatusFilter) -> Vec<&Todo> {
    todos.iter().filter(|todo| filter.matches(todo)).collect()
}

pub fn summarize(todos: &[Todo]) -> TodoSummary {
    let done = todos.iter().filter(|todo| todo.completed).count();

    TodoSummary {
        total: todos.len(),
        pending: todos.len() - done,
        done,
    }
}

/// Recompute every description; returns how many had stale HTML
pub fn rerender_all(todos: &mut [Todo]) -> Result<usize, TodoError> {
    let mut changed = 0;

    for todo in todos.iter_mut() {
        if todo.description.rerender()? {
            changed += 1;
        }
    }

    Ok(changed)
}
