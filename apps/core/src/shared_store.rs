use std::fmt::{Display, Formatter};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::config::Config;

/// Key under which an external component publishes recent search terms.
pub const RECENT_SEARCHES_KEY: &str = "WMFRecentSearches";
/// The contract caps the published sequence at five terms.
pub const MAX_RECENT_SUGGESTIONS: usize = 5;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    Decode(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(error) => write!(f, "sqlite error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Decode(error) => write!(f, "decode error: {error}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub fn open_from_config(cfg: &Config) -> Result<Connection, StoreError> {
    if let Some(parent) = cfg.shared_store_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(&cfg.shared_store_path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS shared_item (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        [],
    )?;
    Ok(())
}

pub fn read_value(db: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value = db
        .query_row(
            "SELECT value FROM shared_item WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Writes belong to the external owner of the store; this is used by that
/// side of the contract (and by tests seeding fixtures). The router only
/// ever reads.
pub fn write_value(db: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    db.execute(
        "INSERT INTO shared_item (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Recent search terms published under `WMFRecentSearches`, oldest-first
/// order preserved, capped at `limit` (never more than the contract's five).
/// Non-string entries are skipped; a payload that is not a JSON array is a
/// decode error.
pub fn recent_search_terms(db: &Connection, limit: usize) -> Result<Vec<String>, StoreError> {
    let Some(raw) = read_value(db, RECENT_SEARCHES_KEY)? else {
        return Ok(Vec::new());
    };
    let entries: Vec<Value> = serde_json::from_str(&raw)
        .map_err(|error| StoreError::Decode(format!("{RECENT_SEARCHES_KEY}: {error}")))?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(term) => Some(term),
            _ => None,
        })
        .take(limit.min(MAX_RECENT_SUGGESTIONS))
        .collect())
}

/// Preview-context stand-ins shown where no real store is reachable.
pub fn placeholder_suggestions() -> Vec<String> {
    ["Wikipedia", "iOS", "Swift"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        open_memory, placeholder_suggestions, read_value, recent_search_terms, write_value,
        StoreError, MAX_RECENT_SUGGESTIONS, RECENT_SEARCHES_KEY,
    };

    #[test]
    fn round_trips_a_value() {
        let db = open_memory().unwrap();
        write_value(&db, "k", "v1").unwrap();
        write_value(&db, "k", "v2").unwrap();
        assert_eq!(read_value(&db, "k").unwrap().as_deref(), Some("v2"));
        assert_eq!(read_value(&db, "missing").unwrap(), None);
    }

    #[test]
    fn missing_recent_searches_key_yields_empty() {
        let db = open_memory().unwrap();
        assert!(recent_search_terms(&db, 5).unwrap().is_empty());
    }

    #[test]
    fn recent_terms_keep_order_and_cap_at_five() {
        let db = open_memory().unwrap();
        write_value(
            &db,
            RECENT_SEARCHES_KEY,
            r#"["a","b","c","d","e","f","g"]"#,
        )
        .unwrap();

        let terms = recent_search_terms(&db, 10).unwrap();
        assert_eq!(terms, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(terms.len(), MAX_RECENT_SUGGESTIONS);

        let fewer = recent_search_terms(&db, 2).unwrap();
        assert_eq!(fewer, vec!["a", "b"]);
    }

    #[test]
    fn non_string_entries_are_skipped() {
        let db = open_memory().unwrap();
        write_value(&db, RECENT_SEARCHES_KEY, r#"["a", 7, null, "b"]"#).unwrap();
        assert_eq!(recent_search_terms(&db, 5).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let db = open_memory().unwrap();
        write_value(&db, RECENT_SEARCHES_KEY, "{not-an-array").unwrap();
        match recent_search_terms(&db, 5) {
            Err(StoreError::Decode(message)) => assert!(message.contains(RECENT_SEARCHES_KEY)),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn placeholders_are_stable() {
        assert_eq!(placeholder_suggestions(), vec!["Wikipedia", "iOS", "Swift"]);
    }
}
