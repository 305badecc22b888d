use super::{content_input, load, save, IdOptions};
use crate::config::Config;
use crate::prelude::{eprintln, println, *};
use chrono::Utc;
use colored::Colorize;
use marknote_core::post::{
    apply_post_update, create_post, find_mut, post_from_markdown_file, remove, rerender_all,
    NewPost, PostUpdate,
};
use std::path::PathBuf;

/// Write a new post
#[derive(Debug, clap::Args)]
pub struct NewOptions {
    /// Post title (at most 200 characters)
    #[arg(long, short = 't')]
    pub title: String,

    /// Content in markdown
    #[arg(long, short = 'c', conflicts_with = "file", required_unless_present = "file")]
    pub content: Option<String>,

    /// Read the content from a markdown file (`-` for stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

/// Import a markdown file as a post
#[derive(Debug, clap::Args)]
pub struct ImportOptions {
    /// Markdown file; its name without the extension becomes the title
    pub path: PathBuf,
}

/// Edit a post; omitted fields are left as they are
#[derive(Debug, clap::Args)]
pub struct EditOptions {
    /// Post id
    pub id: u64,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New content in markdown
    #[arg(long, short = 'c', conflicts_with = "file")]
    pub content: Option<String>,

    /// Read the new content from a markdown file (`-` for stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

pub fn new(options: NewOptions, config: &Config) -> Result<()> {
    let mut posts = load(config)?;

    let new = NewPost {
        title: options.title,
        content: content_input(options.content, options.file)?.unwrap_or_default(),
    };

    let post = create_post(&posts, new, Utc::now())?;
    let id = post.id;
    log::info!("created post {id}");

    posts.push(post);
    save(config, &posts)?;

    println!("{} post {}", "Created".green(), id);
    Ok(())
}

pub fn import(options: ImportOptions, config: &Config) -> Result<()> {
    let content = crate::render::read_input(Some(&options.path))?;
    let mut posts = load(config)?;

    let post = post_from_markdown_file(&posts, &options.path, content, Utc::now())?;
    let (id, title) = (post.id, post.title.clone());
    log::info!("imported {} as post {id}", options.path.display());

    posts.push(post);
    save(config, &posts)?;

    println!("{} post {}: {}", "Imported".green(), id, title);
    Ok(())
}

pub fn edit(options: EditOptions, config: &Config) -> Result<()> {
    let update = PostUpdate {
        title: options.title,
        content: content_input(options.content, options.file)?,
    };

    if update.title.is_none() && update.content.is_none() {
        return Err(Error::EmptyUpdate.into());
    }

    let mut posts = load(config)?;
    apply_post_update(find_mut(&mut posts, options.id)?, update, Utc::now())?;
    save(config, &posts)?;

    println!("{} post {}", "Updated".green(), options.id);
    Ok(())
}

pub fn delete(options: IdOptions, config: &Config) -> Result<()> {
    let mut posts = load(config)?;
    let removed = remove(&mut posts, options.id)?;
    save(config, &posts)?;

    println!("{} post {}: {}", "Deleted".red(), removed.id, removed.title);
    Ok(())
}

pub fn rerender(config: &Config) -> Result<()> {
    let mut posts = load(config)?;
    let changed = rerender_all(&mut posts)?;

    if changed > 0 {
        save(config, &posts)?;
    }

    eprintln!("Re-rendered {} posts, {} changed", posts.len(), changed);
    Ok(())
}
