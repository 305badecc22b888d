#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid UTC offset: {0} hours (expected -12 to 14)")]
    InvalidUtcOffset(i32),

    #[error("Unable to determine a data directory; pass --data-dir or set MARKNOTE_DATA_DIR")]
    NoDataDir,

    #[error("Nothing to update: pass at least one field to change")]
    EmptyUpdate,

    #[error("File not found: {0}")]
    FileNotFound(String),
}
