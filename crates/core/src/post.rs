//! Blog posts and their transformations

use crate::block::ContentBlock;
use crate::markdown::RenderError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum title length, in characters
pub const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Title must be at most 200 characters (got {0})")]
    TitleTooLong(usize),

    #[error("Content is required")]
    EmptyContent,

    #[error("Post not found: {0}")]
    NotFound(u64),

    #[error("Cannot derive a title from file name: {0}")]
    InvalidFileName(String),

    #[error("No free post id left")]
    IdOverflow,

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: ContentBlock,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

fn validate_title(title: &str) -> Result<String, PostError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(PostError::EmptyTitle);
    }

    let length = title.chars().count();
    if length > MAX_TITLE_CHARS {
        return Err(PostError::TitleTooLong(length));
    }

    Ok(title.to_string())
}

fn render_body(content: String) -> Result<ContentBlock, PostError> {
    if content.trim().is_empty() {
        return Err(PostError::EmptyContent);
    }

    Ok(ContentBlock::new(content)?)
}

fn next_id(posts: &[Post]) -> Result<u64, PostError> {
    let last = posts.iter().map(|post| post.id).max().unwrap_or(0);
    last.checked_add(1).ok_or(PostError::IdOverflow)
}

pub fn create_post(existing: &[Post], new: NewPost, now: DateTime<Utc>) -> Result<Post, PostError> {
    let title = validate_title(&new.title)?;
    let body = render_body(new.content)?;

    Ok(Post {
        id: next_id(existing)?,
        title,
        body,
        created_at: now,
        updated_at: now,
    })
}

/// Build a post from a markdown file: the title is the file name without its extension
///
/// Reading the file is left to the caller.
pub fn post_from_markdown_file(
    existing: &[Post],
    path: &Path,
    content: String,
    now: DateTime<Utc>,
) -> Result<Post, PostError> {
    let title = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| PostError::InvalidFileName(path.display().to_string()))?;

    create_post(
        existing,
        NewPost {
            title: title.to_string(),
            content,
        },
        now,
    )
}

/// Apply an edit; the post is unchanged if any part of it is invalid
pub fn apply_post_update(
    post: &mut Post,
    update: PostUpdate,
    now: DateTime<Utc>,
) -> Result<(), PostError> {
    let title = update.title.as_deref().map(validate_title).transpose()?;
    let body = update.content.map(render_body).transpose()?;

    if let Some(title) = title {
        post.title = title;
    }
    if let Some(body) = body {
        post.body = body;
    }

    post.updated_at = now;
    Ok(())
}

pub fn find(posts: &[Post], id: u64) -> Result<&Post, PostError> {
    posts
        .iter()
        .find(|post| post.id == id)
        .ok_or(PostError::NotFound(id))
}

pub fn find_mut(posts: &mut [Post], id: u64) -> Result<&mut Post, PostError> {
    posts
        .iter_mut()
        .find(|post| post.id == id)
        .ok_or(PostError::NotFound(id))
}

pub fn remove(posts: &mut Vec<Post>, id: u64) -> Result<Post, PostError> {
    let index = posts
        .iter()
        .position(|post| post.id == id)
        .ok_or(PostError::NotFound(id))?;

    Ok(posts.remove(index))
}

pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Recompute every body; returns how many had stale HTML
pub fn rerender_all(posts: &mut [Post]) -> Result<usize, PostError> {
    let mut changed = 0;

    for post in posts.iter_mut() {
        if post.body.rerender()? {
            changed += 1;
        }
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap()
    }

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_create_post() {
        let new = new_post(" Hello ", "## Intro\nfirst line\nsecond line");
        let post = create_post(&[], new, at(1)).unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.title, "Hello");
        assert!(post.body.html().contains("<h2>Intro</h2>"));
        assert!(post.body.html().contains("first line<br>"));
    }

    #[test]
    fn test_create_post_requires_title_and_content() {
        assert_eq!(
            create_post(&[], new_post("", "body"), at(1)),
            Err(PostError::EmptyTitle)
        );
        assert_eq!(
            create_post(&[], new_post("title", "  \n"), at(1)),
            Err(PostError::EmptyContent)
        );
        assert!(matches!(
            create_post(&[], new_post(&"x".repeat(201), "body"), at(1)),
            Err(PostError::TitleTooLong(201))
        ));
    }

    #[test]
    fn test_post_from_markdown_file() {
        let post = post_from_markdown_file(
            &[],
            Path::new("/notes/weekly-review.md"),
            "# Week 12\n\n- [x] ship".to_string(),
            at(2),
        )
        .unwrap();

        assert_eq!(post.title, "weekly-review");
        assert_eq!(post.body.source(), "# Week 12\n\n- [x] ship");
        assert!(post.body.html().contains("checked"));
    }

    #[test]
    fn test_post_from_markdown_file_without_name() {
        let result = post_from_markdown_file(&[], Path::new("/"), "body".to_string(), at(2));
        assert!(matches!(result, Err(PostError::InvalidFileName(_))));
    }

    #[test]
    fn test_apply_post_update() {
        let mut post = create_post(&[], new_post("Draft", "old body"), at(1)).unwrap();

        let update = PostUpdate {
            title: Some("Final".to_string()),
            content: Some("new *body*".to_string()),
        };
        apply_post_update(&mut post, update, at(3)).unwrap();

        assert_eq!(post.title, "Final");
        assert_eq!(post.body.html(), "<p>new <em>body</em></p>\n");
        assert_eq!(post.created_at, at(1));
        assert_eq!(post.updated_at, at(3));
    }

    #[test]
    fn test_apply_post_update_rejects_empty_content() {
        let mut post = create_post(&[], new_post("Draft", "body"), at(1)).unwrap();
        let before = post.clone();

        let update = PostUpdate {
            title: Some("Other".to_string()),
            content: Some(String::new()),
        };

        assert_eq!(
            apply_post_update(&mut post, update, at(2)),
            Err(PostError::EmptyContent)
        );
        assert_eq!(post, before);
    }

    #[test]
    fn test_find_remove_and_sort() {
        let mut posts = Vec::new();
        for day in 1..=3 {
            let post = create_post(&posts, new_post(&format!("p{day}"), "body"), at(day)).unwrap();
            posts.push(post);
        }

        assert_eq!(find(&posts, 2).unwrap().title, "p2");
        find_mut(&mut posts, 2).unwrap().title = "renamed".to_string();
        assert_eq!(find(&posts, 2).unwrap().title, "renamed");

        sort_newest_first(&mut posts);
        let ids: Vec<u64> = posts.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        remove(&mut posts, 2).unwrap();
        assert_eq!(find(&posts, 2), Err(PostError::NotFound(2)));
    }

    #[test]
    fn test_rerender_all() {
        let mut posts = vec![create_post(&[], new_post("a", "# A"), at(1)).unwrap()];
        assert_eq!(rerender_all(&mut posts).unwrap(), 0);
    }

    #[test]
    fn test_create_post_fails_when_ids_are_exhausted() {
        let mut last = create_post(&[], new_post("last", "body"), at(1)).unwrap();
        last.id = u64::MAX;

        let result = create_post(&[last], new_post("next", "body"), at(2));
        assert_eq!(result, Err(PostError::IdOverflow));
    }
}
