//! One-shot rendering commands: `render` and `sanitize`

use crate::prelude::{eprintln, println, *};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Stage {
    /// HTML straight from the markdown renderer, before filtering
    Rendered,
    /// HTML after the allow-list filter (default)
    #[default]
    Sanitized,
    /// Both, separated by a ruler
    Both,
}

/// Render markdown to allow-listed HTML
#[derive(Debug, clap::Args)]
pub struct RenderOptions {
    /// Markdown file to read; stdin when omitted or `-`
    pub file: Option<PathBuf>,

    /// Which stage of the pipeline to print
    #[arg(long, value_enum, default_value_t = Stage::Sanitized)]
    pub stage: Stage,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Filter HTML through the allow-list without rendering
#[derive(Debug, clap::Args)]
pub struct SanitizeOptions {
    /// HTML file to read; stdin when omitted or `-`
    pub file: Option<PathBuf>,

    /// Exit with an error if the input is not already clean
    #[arg(long)]
    pub check: bool,
}

/// Read a whole file, or stdin when `path` is absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                return Err(Error::FileNotFound(path.display().to_string()).into());
            }
            std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

pub fn render(options: RenderOptions) -> Result<()> {
    let source = read_input(options.file.as_deref())?;
    let document = marknote_core::markdown::render_document(&source)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    match options.stage {
        Stage::Rendered => print!("{}", document.rendered),
        Stage::Sanitized => print!("{}", document.html),
        Stage::Both => {
            print!("{}", document.rendered);
            println!("----");
            print!("{}", document.html);
        }
    }

    Ok(())
}

pub fn sanitize(options: SanitizeOptions) -> Result<()> {
    let html = read_input(options.file.as_deref())?;
    let clean = marknote_core::markdown::sanitize(&html);

    if options.check {
        if clean != html {
            return Err(eyre!("Input contains markup outside the allow-list"));
        }
        eprintln!("Input is clean");
        return Ok(());
    }

    print!("{clean}");
    Ok(())
}
