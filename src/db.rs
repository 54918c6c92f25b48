use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::table::{ReviewRecord, ReviewTable};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reviews (
            id            INTEGER PRIMARY KEY,
            reviewer      TEXT NOT NULL,
            reviewer_url  TEXT NOT NULL,
            rank          INTEGER NOT NULL,
            artist        TEXT NOT NULL,
            album         TEXT NOT NULL,
            genre         TEXT,
            year          TEXT,
            saved_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(reviewer, rank)
        );
        CREATE INDEX IF NOT EXISTS idx_reviews_reviewer ON reviews(reviewer);
        ",
    )?;
    Ok(())
}

/// Store every row of `table`, replacing earlier rows with the same reviewer and rank.
pub fn save_table(conn: &Connection, table: &ReviewTable) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO reviews
             (reviewer, reviewer_url, rank, artist, album, genre, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for r in table.rows() {
            count += stmt.execute(rusqlite::params![
                r.reviewer, r.reviewer_url, r.rank, r.artist, r.album, r.genre, r.year,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_reviews(
    conn: &Connection,
    reviewer: Option<&str>,
    limit: usize,
) -> Result<Vec<ReviewRecord>> {
    let mut stmt = conn.prepare(
        "SELECT artist, album, rank, genre, year, reviewer, reviewer_url
         FROM reviews
         WHERE (?1 IS NULL OR reviewer = ?1)
         ORDER BY reviewer, rank
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![reviewer, limit as i64], |row| {
            Ok(ReviewRecord {
                artist: row.get(0)?,
                album: row.get(1)?,
                rank: row.get(2)?,
                genre: row.get(3)?,
                year: row.get(4)?,
                reviewer: row.get(5)?,
                reviewer_url: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
