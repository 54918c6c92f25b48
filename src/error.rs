use thiserror::Error;

use crate::fields::Field;

pub type Result<T> = std::result::Result<T, CleanerError>;

#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid tag selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// Raised by transpose when the separator did not cut every string into two pieces.
    #[error(
        "need entries of exactly two parts; check that the separator cut every string once. \
         Offending entries: {offending:?}"
    )]
    Validation { offending: Vec<Vec<String>> },

    #[error("field `{0}` has not been populated yet")]
    MissingField(Field),

    #[error("empty separator")]
    EmptySeparator,

    #[error("table already built for this listing; start a new cleaner to change it")]
    TableBuilt,

    #[error("no strings extracted yet; run tag extraction first")]
    NoStrings,

    #[error("strings have not been split into pairs; run split first")]
    NotSplit,

    #[error("strings are already split into pairs; this step expects the flat extracted sequence")]
    AlreadySplit,

    #[error("delimiter must be exactly two characters (open, close), got {0:?}")]
    Delimiter(String),

    #[error("column `{column}` has {found} entries but the table has {expected} rows")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid recipe: {0}")]
    Recipe(#[from] serde_json::Error),

    #[error("cannot read recipe {path:?}: {source}")]
    RecipeFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
