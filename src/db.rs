//! SQLite storage for lexicon tables

use crate::lexicon::{Lexicon, LexiconError};
use crate::models::{Category, LexiconEntry, LexiconStats, Severity};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS lexicon_entries (
        id INTEGER PRIMARY KEY,
        pattern TEXT NOT NULL UNIQUE COLLATE NOCASE,
        category TEXT NOT NULL,
        severity TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS lexicon_alternatives (
        entry_id INTEGER NOT NULL REFERENCES lexicon_entries(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        alternative TEXT NOT NULL,
        PRIMARY KEY (entry_id, position)
    );
";

/// Create the lexicon tables if they do not exist yet.
pub fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Replace the lexicon stored in `db_path` with `lexicon`.
/// Entries keep their phrase-first order through their row ids.
/// Returns the number of entries written.
pub fn save_lexicon(db_path: &Path, lexicon: &Lexicon) -> Result<usize, DbError> {
    let mut conn = Connection::open(db_path)?;
    create_schema(&conn)?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM lexicon_alternatives", [])?;
    tx.execute("DELETE FROM lexicon_entries", [])?;

    {
        let mut insert_entry = tx.prepare(
            "INSERT INTO lexicon_entries (id, pattern, category, severity) VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut insert_alternative = tx.prepare(
            "INSERT INTO lexicon_alternatives (entry_id, position, alternative) VALUES (?1, ?2, ?3)",
        )?;

        for (i, entry) in lexicon.all_entries().iter().enumerate() {
            let id = i as i64 + 1;
            insert_entry.execute(params![
                id,
                entry.pattern,
                entry.category.as_str(),
                entry.severity.as_str()
            ])?;
            for (position, alternative) in entry.alternatives.iter().enumerate() {
                insert_alternative.execute(params![id, position as i64, alternative])?;
            }
        }
    }

    tx.commit()?;
    info!(entries = lexicon.len(), path = %db_path.display(), "lexicon saved");
    Ok(lexicon.len())
}

/// Read every stored entry, alternatives in their stored order.
pub fn load_entries(db_path: &Path) -> Result<Vec<LexiconEntry>, DbError> {
    let conn = Connection::open(db_path)?;

    let mut alternatives: HashMap<i64, Vec<String>> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT entry_id, alternative
         FROM lexicon_alternatives
         ORDER BY entry_id, position",
    )?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let entry_id: i64 = row.get(0)?;
        let alternative: String = row.get(1)?;
        alternatives.entry(entry_id).or_default().push(alternative);
    }

    let mut stmt = conn.prepare(
        "SELECT id, pattern, category, severity
         FROM lexicon_entries
         ORDER BY id",
    )?;
    let mut rows = stmt.query([])?;
    let mut entries = Vec::new();

    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let pattern: String = row.get(1)?;
        let category: String = row.get(2)?;
        let severity: String = row.get(3)?;

        let category: Category = category
            .parse()
            .map_err(|c| DbError::InvalidData(format!("unknown category {:?} for {:?}", c, pattern)))?;
        let severity: Severity = severity
            .parse()
            .map_err(|s| DbError::InvalidData(format!("unknown severity {:?} for {:?}", s, pattern)))?;

        entries.push(LexiconEntry {
            pattern,
            alternatives: alternatives.remove(&id).unwrap_or_default(),
            category,
            severity,
        });
    }

    if !alternatives.is_empty() {
        debug!(orphans = alternatives.len(), "alternatives without an entry ignored");
    }

    Ok(entries)
}

/// Load and validate the lexicon stored in `db_path`.
pub fn load_lexicon(db_path: &Path) -> Result<Lexicon, DbError> {
    let entries = load_entries(db_path)?;
    if entries.is_empty() {
        return Err(DbError::InvalidData(format!(
            "no lexicon entries in {}",
            db_path.display()
        )));
    }
    let lexicon = Lexicon::new(entries)?;
    info!(entries = lexicon.len(), path = %db_path.display(), "lexicon loaded");
    Ok(lexicon)
}

/// Counts over the stored tables, without compiling any matcher.
pub fn load_lexicon_stats(db_path: &Path) -> Result<LexiconStats, DbError> {
    let conn = Connection::open(db_path)?;

    let total_entries: u64 =
        conn.query_row("SELECT COUNT(*) FROM lexicon_entries", [], |row| row.get(0))?;

    // Stored patterns have single-space word separators
    let phrase_entries: u64 = conn.query_row(
        "SELECT COUNT(*) FROM lexicon_entries WHERE instr(pattern, ' ') > 0",
        [],
        |row| row.get(0),
    )?;

    let total_alternatives: u64 =
        conn.query_row("SELECT COUNT(*) FROM lexicon_alternatives", [], |row| row.get(0))?;

    let mut stats = LexiconStats {
        total_entries: total_entries as usize,
        phrase_entries: phrase_entries as usize,
        word_entries: (total_entries - phrase_entries) as usize,
        total_alternatives: total_alternatives as usize,
        ..Default::default()
    };

    let mut stmt = conn.prepare("SELECT category, COUNT(*) FROM lexicon_entries GROUP BY category")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(0)?;
        let count: u64 = row.get(1)?;
        let category: Category = name
            .parse()
            .map_err(|c| DbError::InvalidData(format!("unknown category {:?}", c)))?;
        stats.by_category.insert(category, count as usize);
    }

    let mut stmt = conn.prepare("SELECT severity, COUNT(*) FROM lexicon_entries GROUP BY severity")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(0)?;
        let count: u64 = row.get(1)?;
        let severity: Severity = name
            .parse()
            .map_err(|s| DbError::InvalidData(format!("unknown severity {:?}", s)))?;
        stats.by_severity.insert(severity, count as usize);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_lexicon() -> Lexicon {
        Lexicon::new(vec![
            LexiconEntry::new("utilize", &["use", "employ"], Category::Corporate, Severity::High),
            LexiconEntry::new("in order to", &["to"], Category::Phrase, Severity::Medium),
            LexiconEntry::new("robust", &["strong"], Category::Buzzword, Severity::Low),
        ])
        .unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lexicon.db");
        let lexicon = small_lexicon();

        assert_eq!(save_lexicon(&path, &lexicon).unwrap(), 3);
        let loaded = load_lexicon(&path).unwrap();

        assert_eq!(loaded.all_entries(), lexicon.all_entries());
        assert_eq!(loaded.all_entries()[0].pattern, "in order to");
        assert_eq!(
            loaded.get("utilize").unwrap().alternatives,
            vec!["use".to_string(), "employ".to_string()]
        );
    }

    #[test]
    fn test_save_replaces_previous_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lexicon.db");

        save_lexicon(&path, &Lexicon::builtin()).unwrap();
        save_lexicon(&path, &small_lexicon()).unwrap();

        let loaded = load_lexicon(&path).unwrap();
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn test_builtin_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("builtin.db");
        let builtin = Lexicon::builtin();

        save_lexicon(&path, &builtin).unwrap();
        let loaded = load_lexicon(&path).unwrap();
        assert_eq!(loaded.all_entries(), builtin.all_entries());
    }

    #[test]
    fn test_stats_match_in_memory_stats() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lexicon.db");
        let lexicon = Lexicon::builtin();
        save_lexicon(&path, &lexicon).unwrap();

        let stored = load_lexicon_stats(&path).unwrap();
        let memory = lexicon.stats();
        assert_eq!(stored.total_entries, memory.total_entries);
        assert_eq!(stored.phrase_entries, memory.phrase_entries);
        assert_eq!(stored.word_entries, memory.word_entries);
        assert_eq!(stored.total_alternatives, memory.total_alternatives);
        assert_eq!(stored.by_category, memory.by_category);
        assert_eq!(stored.by_severity, memory.by_severity);
    }

    #[test]
    fn test_empty_database_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.db");
        let conn = Connection::open(&path).unwrap();
        create_schema(&conn).unwrap();
        drop(conn);

        assert!(load_entries(&path).unwrap().is_empty());
        assert!(matches!(load_lexicon(&path), Err(DbError::InvalidData(_))));
    }

    #[test]
    fn test_invalid_category_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.db");
        let conn = Connection::open(&path).unwrap();
        create_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO lexicon_entries (id, pattern, category, severity) VALUES (1, 'foo', 'slang', 'low')",
            [],
        )
        .unwrap();
        drop(conn);

        assert!(matches!(load_entries(&path), Err(DbError::InvalidData(_))));
    }

    #[test]
    fn test_entry_without_alternatives_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.db");
        let conn = Connection::open(&path).unwrap();
        create_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO lexicon_entries (id, pattern, category, severity) VALUES (1, 'foo', 'buzzword', 'low')",
            [],
        )
        .unwrap();
        drop(conn);

        assert!(matches!(
            load_lexicon(&path),
            Err(DbError::Lexicon(LexiconError::NoAlternatives(_)))
        ));
    }
}
