//! The Bear note database.
//!
//! Bear is a Core Data application: notes live in the `ZSFNOTE` table of a
//! SQLite file, with the title in `ZTITLE` and the full Markdown text in
//! `ZTEXT`. bhugo only ever reads from it.
//!
//! The [`NoteSource`] trait is the seam between change detection and the
//! database; [`BearDatabase`] is the production implementation and tests use
//! a scripted mock.

use crate::types::Note;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Bear database not found: {0}")]
    NotFound(String),
}

/// Anything that can list the notes containing a tag marker.
pub trait NoteSource: Send {
    /// Every note whose text contains `marker` (case-sensitive substring).
    fn tagged_notes(&self, marker: &str) -> Result<Vec<Note>, SourceError>;
}

const TAGGED_NOTES_QUERY: &str =
    "SELECT ZTITLE, ZTEXT FROM ZSFNOTE WHERE instr(ZTEXT, ?1) > 0 ORDER BY Z_PK";

/// Read-only connection to Bear's `database.sqlite`.
pub struct BearDatabase {
    conn: Connection,
}

impl BearDatabase {
    /// Open the database read-only. Bear keeps writing to it while we poll.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl NoteSource for BearDatabase {
    fn tagged_notes(&self, marker: &str) -> Result<Vec<Note>, SourceError> {
        let mut stmt = self.conn.prepare_cached(TAGGED_NOTES_QUERY)?;
        let mut rows = stmt.query([marker])?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let Some(title) = row.get::<_, Option<String>>(0)? else {
                continue;
            };
            let body = match row.get_ref(1)? {
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
                _ => continue,
            };
            notes.push(Note { title, body });
        }
        Ok(notes)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock source that replays scripted poll results, one per call.
    /// Once the script runs out it keeps returning the last result.
    #[derive(Clone, Default)]
    pub struct MockSource {
        script: Arc<Mutex<VecDeque<Option<Vec<Note>>>>>,
        last: Arc<Mutex<Vec<Note>>>,
        pub markers: Arc<Mutex<Vec<String>>>,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn then_notes(self, notes: Vec<Note>) -> Self {
            self.script.lock().unwrap().push_back(Some(notes));
            self
        }

        pub fn then_error(self) -> Self {
            self.script.lock().unwrap().push_back(None);
            self
        }
    }

    impl NoteSource for MockSource {
        fn tagged_notes(&self, marker: &str) -> Result<Vec<Note>, SourceError> {
            self.markers.lock().unwrap().push(marker.to_string());
            match self.script.lock().unwrap().pop_front() {
                Some(Some(notes)) => {
                    *self.last.lock().unwrap() = notes.clone();
                    Ok(notes)
                }
                Some(None) => Err(SourceError::Sqlite(rusqlite::Error::InvalidQuery)),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }
    }

    /// In-memory database with Bear's note table.
    pub fn bear_connection(notes: &[(Option<&str>, Option<&str>)]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE ZSFNOTE (Z_PK INTEGER PRIMARY KEY, ZTITLE VARCHAR, ZTEXT VARCHAR);")
            .unwrap();
        for (title, text) in notes {
            conn.execute(
                "INSERT INTO ZSFNOTE (ZTITLE, ZTEXT) VALUES (?1, ?2)",
                rusqlite::params![title, text],
            )
            .unwrap();
        }
        conn
    }

    #[test]
    fn selects_notes_containing_marker() {
        let db = BearDatabase::from_connection(bear_connection(&[
            (Some("Post"), Some("# Post\n#blog/rust\n\nBody")),
            (Some("Private"), Some("# Private\n#diary\n\nBody")),
        ]));
        let notes = db.tagged_notes("#blog").unwrap();
        assert_eq!(notes, vec![Note::new("Post", "# Post\n#blog/rust\n\nBody")]);
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let db = BearDatabase::from_connection(bear_connection(&[(
            Some("Shouty"),
            Some("# Shouty\n#BLOG\n\nBody"),
        )]));
        assert!(db.tagged_notes("#blog").unwrap().is_empty());
    }

    #[test]
    fn null_rows_are_skipped() {
        let db = BearDatabase::from_connection(bear_connection(&[
            (None, Some("#blog untitled")),
            (Some("Empty"), None),
        ]));
        assert!(db.tagged_notes("#blog").unwrap().is_empty());
    }

    #[test]
    fn missing_table_is_an_error() {
        let db = BearDatabase::from_connection(Connection::open_in_memory().unwrap());
        assert!(matches!(db.tagged_notes("#blog"), Err(SourceError::Sqlite(_))));
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = BearDatabase::open(&tmp.path().join("database.sqlite"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn mock_replays_script_then_repeats_last() {
        let mock = MockSource::new()
            .then_notes(vec![Note::new("A", "1")])
            .then_error()
            .then_notes(vec![Note::new("A", "2")]);
        assert_eq!(mock.tagged_notes("#x").unwrap()[0].body, b"1");
        assert!(mock.tagged_notes("#x").is_err());
        assert_eq!(mock.tagged_notes("#x").unwrap()[0].body, b"2");
        assert_eq!(mock.tagged_notes("#x").unwrap()[0].body, b"2");
        assert_eq!(mock.markers.lock().unwrap().len(), 4);
    }
}
