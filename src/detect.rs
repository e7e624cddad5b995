//! Change detection over the Bear database.
//!
//! Bear offers no change feed, so every poll returns every tagged note and
//! [`ChangeDetector`] decides which ones were actually edited by comparing
//! each note's text byte-for-byte with what it saw last time.
//!
//! ## Cache rules
//!
//! | Title in cache? | Text equal? | Result |
//! |-----------------|-------------|--------|
//! | no              | –           | cached, not emitted |
//! | yes             | yes         | skipped |
//! | yes             | no          | cache updated, emitted |
//!
//! The first sighting of a note never emits: starting the watcher does not
//! rewrite every published post. Use `bhugo sync` for an initial import.
//!
//! Titles that stop matching (tag removed, note deleted) stay in the cache for
//! the life of the process. Re-tagging such a note later is compared against
//! that stale text.

use crate::source::NoteSource;
use crate::types::Note;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// Polls a [`NoteSource`] and reports genuinely changed notes.
///
/// The cache is owned here and never shared; the detector lives inside a
/// single task for its whole life.
pub struct ChangeDetector<S> {
    source: S,
    marker: String,
    cache: HashMap<String, Vec<u8>>,
}

impl<S: NoteSource> ChangeDetector<S> {
    /// `marker` is the text a note must contain, e.g. `#blog`.
    pub fn new(source: S, marker: impl Into<String>) -> Self {
        Self {
            source,
            marker: marker.into(),
            cache: HashMap::new(),
        }
    }

    /// Query the source once and return the notes that changed since the
    /// previous poll, in query order.
    ///
    /// A failing query is logged and reported as "nothing changed"; the next
    /// poll simply tries again.
    pub fn poll(&mut self) -> Vec<Note> {
        let notes = match self.source.tagged_notes(&self.marker) {
            Ok(notes) => notes,
            Err(e) => {
                error!(error = %e, "querying Bear failed");
                return Vec::new();
            }
        };

        let mut changed = Vec::new();
        for note in notes {
            match self.cache.get_mut(&note.title) {
                None => {
                    debug!(title = %note.title, "watching note");
                    self.cache.insert(note.title, note.body);
                }
                Some(cached) if *cached == note.body => {}
                Some(cached) => {
                    info!(title = %note.title, "differences detected, updating Hugo");
                    cached.clone_from(&note.body);
                    changed.push(note);
                }
            }
        }
        changed
    }

    /// Number of titles seen so far.
    pub fn watched(&self) -> usize {
        self.cache.len()
    }
}
