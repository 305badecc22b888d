use crate::prelude::*;
use clap::Parser;

mod blog;
mod config;
mod error;
mod prelude;
mod render;
mod serve;
mod todo;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Markdown to-do lists and blog posts, rendered to allow-listed HTML"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Directory holding todos.json and posts.json
    #[clap(long, env = "MARKNOTE_DATA_DIR", global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Offset from UTC, in hours, used when displaying timestamps
    #[clap(
        long,
        env = "MARKNOTE_UTC_OFFSET",
        global = true,
        default_value = "9",
        allow_hyphen_values = true
    )]
    utc_offset: i32,

    /// Whether to display additional information.
    #[clap(long, env = "MARKNOTE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Render markdown to allow-listed HTML
    Render(crate::render::RenderOptions),

    /// Filter HTML through the allow-list only
    Sanitize(crate::render::SanitizeOptions),

    /// To-do items with markdown descriptions
    Todo(crate::todo::App),

    /// Blog posts written in markdown
    Blog(crate::blog::App),

    /// Serve to-dos and posts over HTTP
    Serve(crate::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    let config = crate::config::Config::from_global(&app.global)?;

    match app.command {
        SubCommands::Render(options) => crate::render::render(options),
        SubCommands::Sanitize(options) => crate::render::sanitize(options),
        SubCommands::Todo(sub_app) => crate::todo::run(sub_app, &config),
        SubCommands::Blog(sub_app) => crate::blog::run(sub_app, &config),
        SubCommands::Serve(options) => crate::serve::run(options, config).await,
    }
}
