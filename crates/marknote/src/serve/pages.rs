//! Server-rendered HTML pages
//!
//! Titles are escaped here; bodies are the stored sanitized HTML and are embedded as is.

use super::api::{load_posts, load_todos};
use super::error::ApiError;
use super::AppState;
use axum::extract::{Path, State};
use axum::response::Html;
use chrono::{DateTime, FixedOffset, Utc};
use html_escape::encode_text;
use marknote_core::{post, todo};
use std::fmt::Write;
use std::sync::Arc;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        encode_text(title),
        body
    )
}

fn timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(TIME_FORMAT).to_string()
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let mut todos = load_todos(&state)?;
    todo::sort_newest_first(&mut todos);
    let mut posts = load_posts(&state)?;
    post::sort_newest_first(&mut posts);

    let summary = todo::summarize(&todos);
    let mut body = String::new();

    let _ = writeln!(
        body,
        "<h1>To-dos</h1>\n<p>{} total, {} pending, {} done</p>\n<ul>",
        summary.total, summary.pending, summary.done
    );
    for item in &todos {
        let _ = writeln!(
            body,
            "<li><a href=\"/todos/{}\">{}{}</a> <small>{}</small></li>",
            item.id,
            if item.completed { "&#10003; " } else { "" },
            encode_text(&item.title),
            item.priority
        );
    }
    body.push_str("</ul>\n");

    body.push_str("<h1>Posts</h1>\n<ul>\n");
    for entry in &posts {
        let _ = writeln!(
            body,
            "<li><a href=\"/posts/{}\">{}</a> <small>{}</small></li>",
            entry.id,
            encode_text(&entry.title),
            timestamp(entry.created_at, state.config.utc_offset)
        );
    }
    body.push_str("</ul>\n");

    Ok(Html(layout("marknote", &body)))
}

pub async fn todo_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, ApiError> {
    let todos = load_todos(&state)?;
    let item = todo::find(&todos, id)?;

    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", encode_text(&item.title));
    let _ = writeln!(
        body,
        "<p>{} &middot; priority {}{}</p>",
        if item.completed { "done" } else { "pending" },
        item.priority,
        item.due_date
            .map(|date| format!(" &middot; due {date}"))
            .unwrap_or_default()
    );
    let _ = writeln!(body, "<article>\n{}</article>", item.description.html());
    let _ = writeln!(
        body,
        "<p><small>created {}, updated {}</small></p>\n<p><a href=\"/\">back</a></p>",
        timestamp(item.created_at, state.config.utc_offset),
        timestamp(item.updated_at, state.config.utc_offset)
    );

    Ok(Html(layout(&item.title, &body)))
}

pub async fn post_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, ApiError> {
    let posts = load_posts(&state)?;
    let entry = post::find(&posts, id)?;

    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", encode_text(&entry.title));
    let _ = writeln!(
        body,
        "<p><small>{}</small></p>",
        timestamp(entry.created_at, state.config.utc_offset)
    );
    let _ = writeln!(body, "<article>\n{}</article>", entry.body.html());
    body.push_str("<p><a href=\"/\">back</a></p>\n");

    Ok(Html(layout(&entry.title, &body)))
}
