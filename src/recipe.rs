//! JSON description of a cleaning run, so a listing can be processed from
//! the command line without writing Rust.
//!
//! ```json
//! {
//!   "url": "https://example.com/best-albums-2000s",
//!   "name": "example",
//!   "steps": [
//!     { "op": "tags", "tag": "h2", "attrs": { "class": "review-title" } },
//!     { "op": "split", "sep": ": " },
//!     { "op": "transpose" },
//!     { "op": "year", "field": "albums", "delim": "()" }
//!   ],
//!   "ranks": "descending"
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::cache::Source;
use crate::cleaner::DataCleaner;
use crate::error::{CleanerError, Result};
use crate::extract::TagSelector;
use crate::fields::Field;
use crate::table::ReviewTable;
use crate::transform::Transform;

#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    pub url: String,
    pub name: String,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub ranks: Ranks,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tags(TagSelector),
    Split {
        sep: String,
    },
    Reorganize,
    Transpose,
    Apply {
        field: Field,
        func: Transform,
    },
    Trim {
        field: Field,
        #[serde(default)]
        chars: Option<String>,
        #[serde(default = "default_true")]
        left: bool,
        #[serde(default)]
        right: bool,
    },
    Year {
        field: Field,
        #[serde(default = "default_delim")]
        delim: String,
    },
}

fn default_true() -> bool {
    true
}

fn default_delim() -> String {
    "()".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Ranks {
    List(Vec<u32>),
    Order(RankOrder),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    Ascending,
    Descending,
}

impl Default for Ranks {
    fn default() -> Self {
        Ranks::Order(RankOrder::Ascending)
    }
}

impl Ranks {
    /// Ranks for `n` records. Explicit lists are returned untouched so a
    /// wrong length surfaces when the table is assembled.
    pub fn resolve(&self, n: usize) -> Vec<u32> {
        let n = n as u32;
        match self {
            Ranks::List(list) => list.clone(),
            Ranks::Order(RankOrder::Ascending) => (1..=n).collect(),
            Ranks::Order(RankOrder::Descending) => (1..=n).rev().collect(),
        }
    }
}

impl Recipe {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CleanerError::RecipeFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn source(&self) -> Source {
        Source::new(&self.url, &self.name)
    }

    /// Run every step against `cleaner`, then assemble the table.
    pub fn run(&self, cleaner: &mut DataCleaner) -> Result<ReviewTable> {
        for step in &self.steps {
            debug!("{}: {:?}", self.name, step);
            apply_step(cleaner, step)?;
        }
        let ranks = self.ranks.resolve(cleaner.len().unwrap_or(0));
        Ok(cleaner.create_table(&ranks)?.clone())
    }
}

fn apply_step(cleaner: &mut DataCleaner, step: &Step) -> Result<()> {
    match step {
        Step::Tags(selector) => cleaner.create_tags(selector).map(|_| ()),
        Step::Split { sep } => cleaner.split(sep),
        Step::Reorganize => cleaner.reorganize(),
        Step::Transpose => cleaner.transpose(),
        Step::Apply { field, func } => cleaner.apply(*field, |s| func.apply(s)),
        Step::Trim {
            field,
            chars,
            left,
            right,
        } => cleaner.trim(*field, chars.as_deref(), *left, *right),
        Step::Year { field, delim } => cleaner.extract_year_from_paren(*field, delim),
    }
}
