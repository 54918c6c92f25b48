use std::fmt;

use serde::Serialize;

use crate::error::{CleanerError, Result};

pub const BASE_COLUMNS: [&str; 6] = ["artist", "album", "rank", "genre", "reviewer", "reviewer_url"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub artist: String,
    pub album: String,
    pub rank: u32,
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub reviewer: String,
    pub reviewer_url: String,
}

/// One reviewer's ranked list. `year` is a column only when years were extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewTable {
    has_year: bool,
    rows: Vec<ReviewRecord>,
}

/// Column inputs for [`ReviewTable::assemble`].
pub struct Columns<'a> {
    pub artists: &'a [String],
    pub albums: &'a [String],
    pub ranks: &'a [u32],
    pub years: Option<&'a [String]>,
    pub reviewer: &'a str,
    pub reviewer_url: &'a str,
}

impl ReviewTable {
    /// Zip the columns into rows. Every column must have one entry per artist.
    pub fn assemble(cols: Columns<'_>) -> Result<Self> {
        let expected = cols.artists.len();
        check_len("album", expected, cols.albums.len())?;
        check_len("rank", expected, cols.ranks.len())?;
        if let Some(years) = cols.years {
            check_len("year", expected, years.len())?;
        }

        let rows = (0..expected)
            .map(|i| ReviewRecord {
                artist: cols.artists[i].clone(),
                album: cols.albums[i].clone(),
                rank: cols.ranks[i],
                genre: None,
                year: cols.years.map(|y| y[i].clone()),
                reviewer: cols.reviewer.to_string(),
                reviewer_url: cols.reviewer_url.to_string(),
            })
            .collect();

        Ok(ReviewTable {
            has_year: cols.years.is_some(),
            rows,
        })
    }

    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = BASE_COLUMNS.to_vec();
        if self.has_year {
            cols.insert(4, "year");
        }
        cols
    }

    pub fn has_year(&self) -> bool {
        self.has_year
    }

    pub fn rows(&self) -> &[ReviewRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}

fn check_len(column: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CleanerError::LengthMismatch {
            column,
            expected,
            found,
        })
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

impl fmt::Display for ReviewTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4} | {:<24} | {:<28} | {:<5} | {:<5} | {:<12}",
            "rank", "artist", "album", "genre", "year", "reviewer"
        )?;
        writeln!(f, "{}", "-".repeat(94))?;
        for r in &self.rows {
            writeln!(
                f,
                "{:>4} | {:<24} | {:<28} | {:<5} | {:<5} | {:<12}",
                r.rank,
                truncate(&r.artist, 24),
                truncate(&r.album, 28),
                r.genre.as_deref().unwrap_or("-"),
                r.year.as_deref().unwrap_or("-"),
                truncate(&r.reviewer, 12),
            )?;
        }
        if let Some(first) = self.rows.first() {
            writeln!(f, "\n{} rows | source: {}", self.rows.len(), first.reviewer_url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_rows_with_constant_reviewer() {
        let artists = strings(&["A", "B"]);
        let albums = strings(&["X", "Y"]);
        let table = ReviewTable::assemble(Columns {
            artists: &artists,
            albums: &albums,
            ranks: &[1, 2],
            years: None,
            reviewer: "pitchfork",
            reviewer_url: "https://example.com/list",
        })
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns(),
            vec!["artist", "album", "rank", "genre", "reviewer", "reviewer_url"]
        );
        assert!(table.rows().iter().all(|r| r.genre.is_none()));
        assert!(table.rows().iter().all(|r| r.reviewer == "pitchfork"));
        assert!(table.rows().iter().all(|r| r.reviewer_url == "https://example.com/list"));
        assert_eq!(table.rows()[1].rank, 2);
        assert_eq!(table.rows()[1].album, "Y");
    }

    #[test]
    fn year_column_only_when_extracted() {
        let artists = strings(&["A"]);
        let albums = strings(&["X (1994)"]);
        let years = strings(&["1994"]);
        let table = ReviewTable::assemble(Columns {
            artists: &artists,
            albums: &albums,
            ranks: &[1],
            years: Some(&years),
            reviewer: "r",
            reviewer_url: "u",
        })
        .unwrap();
        assert!(table.columns().contains(&"year"));
        assert_eq!(table.rows()[0].year.as_deref(), Some("1994"));

        let json = table.to_json().unwrap();
        assert!(json.contains("\"year\": \"1994\""));
        assert!(json.contains("\"genre\": null"));
    }

    #[test]
    fn rank_length_mismatch_is_an_error() {
        let artists = strings(&["A", "B"]);
        let albums = strings(&["X", "Y"]);
        let err = ReviewTable::assemble(Columns {
            artists: &artists,
            albums: &albums,
            ranks: &[1],
            years: None,
            reviewer: "r",
            reviewer_url: "u",
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CleanerError::LengthMismatch { column: "rank", expected: 2, found: 1 }
        ));
    }

    #[test]
    fn display_truncates_long_names() {
        assert_eq!(truncate("Godspeed You! Black Emperor", 8), "Godspeed...");
        assert_eq!(truncate("Low", 8), "Low");
    }
}
