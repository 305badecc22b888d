//! JSON endpoints

use super::error::ApiError;
use super::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use marknote_core::markdown::render;
use marknote_core::post::{self, NewPost, Post, PostUpdate};
use marknote_core::store::{load_records, save_records};
use marknote_core::todo::{self, DueDateChange, NewTodo, Priority, StatusFilter, Todo, TodoUpdate};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: StatusFilter,
}

/// Body of `POST /api/todos`; dates and priorities arrive as plain strings
#[derive(Debug, Deserialize)]
pub struct NewTodoBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

/// Body of `POST /api/todos/{id}`
///
/// `due_date` distinguishes a missing field (keep) from `null` (clear).
#[derive(Debug, Default, Deserialize)]
pub struct TodoUpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_priority(input: Option<String>) -> Result<Option<Priority>, todo::TodoError> {
    input.map(|p| p.parse()).transpose()
}

impl NewTodoBody {
    fn into_new_todo(self) -> Result<NewTodo, todo::TodoError> {
        Ok(NewTodo {
            title: self.title,
            description: self.description,
            priority: parse_priority(self.priority)?.unwrap_or_default(),
            due_date: self
                .due_date
                .filter(|date| !date.trim().is_empty())
                .map(|date| todo::parse_due_date(&date))
                .transpose()?,
        })
    }
}

impl TodoUpdateBody {
    fn into_update(self) -> Result<TodoUpdate, todo::TodoError> {
        let due_date = match self.due_date {
            None => DueDateChange::Keep,
            Some(None) => DueDateChange::Clear,
            Some(Some(date)) if date.trim().is_empty() => DueDateChange::Clear,
            Some(Some(date)) => DueDateChange::Set(todo::parse_due_date(&date)?),
        };

        Ok(TodoUpdate {
            title: self.title,
            description: self.description,
            priority: parse_priority(self.priority)?,
            due_date,
        })
    }
}

pub(super) fn load_todos(state: &AppState) -> ApiResult<Vec<Todo>> {
    Ok(load_records(&state.config.todos_path())?)
}

fn save_todos(state: &AppState, todos: &[Todo]) -> ApiResult<()> {
    Ok(save_records(&state.config.todos_path(), todos)?)
}

pub(super) fn load_posts(state: &AppState) -> ApiResult<Vec<Post>> {
    Ok(load_records(&state.config.posts_path())?)
}

fn save_posts(state: &AppState, posts: &[Post]) -> ApiResult<()> {
    Ok(save_records(&state.config.posts_path(), posts)?)
}

pub async fn render_markdown(
    Json(request): Json<RenderRequest>,
) -> ApiResult<Json<RenderResponse>> {
    let html = render(&request.markdown)?;
    Ok(Json(RenderResponse { html }))
}

pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Todo>>> {
    let mut todos = load_todos(&state)?;
    todo::sort_newest_first(&mut todos);
    todos.retain(|item| query.status.matches(item));

    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewTodoBody>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let new = body.into_new_todo()?;

    let mut todos = load_todos(&state)?;
    let created = todo::create_todo(&todos, new, Utc::now())?;
    todos.push(created.clone());
    save_todos(&state, &todos)?;

    log::info!("created to-do {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Todo>> {
    let todos = load_todos(&state)?;
    Ok(Json(todo::find(&todos, id)?.clone()))
}

pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(body): Json<TodoUpdateBody>,
) -> ApiResult<Json<Todo>> {
    let update = body.into_update()?;

    let mut todos = load_todos(&state)?;
    let item = todo::find_mut(&mut todos, id)?;
    todo::apply_update(item, update, Utc::now())?;
    let updated = item.clone();
    save_todos(&state, &todos)?;

    Ok(Json(updated))
}

pub async fn toggle_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Todo>> {
    let mut todos = load_todos(&state)?;
    let item = todo::find_mut(&mut todos, id)?;
    todo::toggle(item, Utc::now());
    let toggled = item.clone();
    save_todos(&state, &todos)?;

    Ok(Json(toggled))
}

pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    let mut todos = load_todos(&state)?;
    todo::remove(&mut todos, id)?;
    save_todos(&state, &todos)?;

    log::info!("deleted to-do {id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_posts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Post>>> {
    let mut posts = load_posts(&state)?;
    post::sort_newest_first(&mut posts);

    Ok(Json(posts))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewPost>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let mut posts = load_posts(&state)?;
    let created = post::create_post(&posts, new, Utc::now())?;
    posts.push(created.clone());
    save_posts(&state, &posts)?;

    log::info!("created post {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Post>> {
    let posts = load_posts(&state)?;
    Ok(Json(post::find(&posts, id)?.clone()))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(update): Json<PostUpdate>,
) -> ApiResult<Json<Post>> {
    let mut posts = load_posts(&state)?;
    let item = post::find_mut(&mut posts, id)?;
    post::apply_post_update(item, update, Utc::now())?;
    let updated = item.clone();
    save_posts(&state, &posts)?;

    Ok(Json(updated))
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    let mut posts = load_posts(&state)?;
    post::remove(&mut posts, id)?;
    save_posts(&state, &posts)?;

    log::info!("deleted post {id}");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_due_date_states() {
        let keep: TodoUpdateBody = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(keep.into_update().unwrap().due_date, DueDateChange::Keep);

        let clear: TodoUpdateBody = serde_json::from_str(r#"{"due_date":null}"#).unwrap();
        assert_eq!(clear.into_update().unwrap().due_date, DueDateChange::Clear);

        let set: TodoUpdateBody = serde_json::from_str(r#"{"due_date":"2025-07-04"}"#).unwrap();
        assert_eq!(
            set.into_update().unwrap().due_date,
            DueDateChange::Set(chrono::NaiveDate::from_ymd_opt(2025, 7, 4).unwrap())
        );
    }

    #[test]
    fn test_new_body_validation() {
        let body: NewTodoBody =
            serde_json::from_str(r#"{"title":"t","priority":"urgent"}"#).unwrap();
        assert!(matches!(
            body.into_new_todo(),
            Err(todo::TodoError::InvalidPriority(_))
        ));

        let body: NewTodoBody =
            serde_json::from_str(r#"{"title":"t","due_date":"next week"}"#).unwrap();
        assert!(matches!(
            body.into_new_todo(),
            Err(todo::TodoError::InvalidDueDate(_))
        ));

        let body: NewTodoBody =
            serde_json::from_str(r#"{"title":"t","priority":"HIGH","due_date":""}"#).unwrap();
        let new = body.into_new_todo().unwrap();
        assert_eq!(new.priority, Priority::High);
        assert_eq!(new.due_date, None);
    }
}
