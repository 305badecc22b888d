use super::load;
use crate::config::Config;
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use marknote_core::post::{find, sort_newest_first};
use prettytable::row;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// List posts
#[derive(Debug, clap::Args)]
pub struct ListOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show one post
#[derive(Debug, clap::Args)]
pub struct ShowOptions {
    /// Post id
    pub id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the markdown source instead of the rendered HTML
    #[arg(long)]
    pub source: bool,
}

pub fn list(options: ListOptions, config: &Config) -> Result<()> {
    let mut posts = load(config)?;
    sort_newest_first(&mut posts);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        eprintln!("No posts");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(row![
        "ID".bold().cyan(),
        "TITLE".bold().cyan(),
        "CREATED".bold().cyan(),
        "UPDATED".bold().cyan()
    ]);

    for post in &posts {
        table.add_row(row![
            post.id,
            post.title,
            post.created_at
                .with_timezone(&config.utc_offset)
                .format(TIME_FORMAT),
            post.updated_at
                .with_timezone(&config.utc_offset)
                .format(TIME_FORMAT)
        ]);
    }

    table.printstd();
    Ok(())
}

pub fn show(options: ShowOptions, config: &Config) -> Result<()> {
    let posts = load(config)?;
    let post = find(&posts, options.id)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(post)?);
        return Ok(());
    }

    println!(
        "\n{} {}\n{}\n",
        format!("#{}", post.id).bold().cyan(),
        post.title.bright_white(),
        post.created_at
            .with_timezone(&config.utc_offset)
            .format(TIME_FORMAT)
            .to_string()
            .bright_black()
    );

    if options.source {
        println!("{}", post.body.source());
    } else {
        print!("{}", post.body.html());
    }

    Ok(())
}
