mod list;
mod write;

use crate::config::Config;
use crate::prelude::{eprintln, *};
use marknote_core::post::Post;
use marknote_core::store::{load_records, save_records};
use std::path::PathBuf;

pub use list::{ListOptions, ShowOptions};
pub use write::{EditOptions, ImportOptions, NewOptions};

#[derive(Debug, clap::Parser)]
#[command(name = "blog")]
#[command(about = "Blog posts written in markdown")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Write a new post
    #[clap(name = "new")]
    New(NewOptions),

    /// Create a post from a markdown file, titled after the file name
    #[clap(name = "import")]
    Import(ImportOptions),

    /// List posts, newest first
    #[clap(name = "list")]
    List(ListOptions),

    /// Show a single post
    #[clap(name = "show")]
    Show(ShowOptions),

    /// Edit the title or content of a post
    #[clap(name = "edit")]
    Edit(EditOptions),

    /// Delete a post
    #[clap(name = "delete")]
    Delete(IdOptions),

    /// Recompute the stored HTML of every post
    #[clap(name = "rerender")]
    Rerender,
}

#[derive(Debug, clap::Args)]
pub struct IdOptions {
    /// Post id
    pub id: u64,
}

pub fn run(app: App, config: &Config) -> Result<()> {
    if config.verbose {
        eprintln!("Using {}", config.posts_path().display());
    }

    match app.command {
        Commands::New(options) => write::new(options, config),
        Commands::Import(options) => write::import(options, config),
        Commands::List(options) => list::list(options, config),
        Commands::Show(options) => list::show(options, config),
        Commands::Edit(options) => write::edit(options, config),
        Commands::Delete(options) => write::delete(options, config),
        Commands::Rerender => write::rerender(config),
    }
}

fn load(config: &Config) -> Result<Vec<Post>> {
    Ok(load_records(&config.posts_path())?)
}

fn save(config: &Config, posts: &[Post]) -> Result<()> {
    Ok(save_records(&config.posts_path(), posts)?)
}

/// Pick the content from `--content` or `--file`
fn content_input(text: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
    match (text, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(file)) => crate::render::read_input(Some(&file)).map(Some),
        (None, None) => Ok(None),
    }
}
