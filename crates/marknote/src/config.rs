use crate::prelude::*;
use chrono::FixedOffset;
use marknote_core::store::{POSTS_FILE, TODOS_FILE};
use std::path::PathBuf;

/// Runtime configuration, built once in `main` and passed down by reference
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub utc_offset: FixedOffset,
    pub verbose: bool,
}

impl Config {
    /// Resolve global flags (and their environment fallbacks)
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let data_dir = match &global.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };

        Ok(Self {
            data_dir,
            utc_offset: utc_offset(global.utc_offset)?,
            verbose: global.verbose,
        })
    }

    pub fn todos_path(&self) -> PathBuf {
        self.data_dir.join(TODOS_FILE)
    }

    pub fn posts_path(&self) -> PathBuf {
        self.data_dir.join(POSTS_FILE)
    }
}

/// `<platform data dir>/marknote`
fn default_data_dir() -> Result<PathBuf> {
    dirs_next::data_dir()
        .map(|dir| dir.join("marknote"))
        .ok_or_else(|| Error::NoDataDir.into())
}

fn utc_offset(hours: i32) -> Result<FixedOffset> {
    if !(-12..=14).contains(&hours) {
        return Err(Error::InvalidUtcOffset(hours).into());
    }

    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| Error::InvalidUtcOffset(hours).into())
}
