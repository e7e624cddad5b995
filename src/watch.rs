//! The watch loop: polling Bear and writing posts, concurrently.
//!
//! ```text
//!   detect task                          convert task
//!   ───────────                          ────────────
//!   tick ─► ChangeDetector::poll ─► mpsc(1) ─► Converter::apply ─► post.md
//!     ▲                                  ▲
//!     └──────── broadcast shutdown ──────┘
//! ```
//!
//! Two tokio tasks connected by a channel of capacity one. The detect task
//! owns the [`ChangeDetector`] and its cache outright; the convert task owns
//! the [`Converter`] and is the only writer to the content directory, so at
//! most one post is written at a time and posts are written in the order
//! their changes were detected.
//!
//! While the convert task is busy, the detect task blocks on the channel and
//! misses ticks. Missed ticks are skipped, not replayed: the next poll sees
//! the latest text anyway.
//!
//! Shutdown is a single broadcast token that both tasks select on next to
//! their blocking operation. A pending tick or queued note is dropped, never
//! half-processed.

use crate::convert::{Conversion, Converter};
use crate::detect::ChangeDetector;
use crate::source::{NoteSource, SourceError};
use crate::types::Note;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Continuous Bear → Hugo synchronization.
pub struct Watcher<S> {
    detector: ChangeDetector<S>,
    converter: Converter,
    interval: Duration,
}

/// Handles to the two running tasks.
pub struct Running {
    detect: JoinHandle<()>,
    convert: JoinHandle<()>,
}

impl Running {
    /// Wait for both tasks to exit.
    pub async fn wait(self) {
        let (detect, convert) = tokio::join!(self.detect, self.convert);
        for (task, result) in [("detect", detect), ("convert", convert)] {
            if let Err(e) = result {
                error!(task, error = %e, "task ended abnormally");
            }
        }
    }
}

impl<S: NoteSource + 'static> Watcher<S> {
    pub fn new(detector: ChangeDetector<S>, converter: Converter, interval: Duration) -> Self {
        Self {
            detector,
            converter,
            interval,
        }
    }

    /// Spawn both tasks. They run until a token is sent on `shutdown` (or
    /// every sender is dropped).
    pub fn start(self, shutdown: &broadcast::Sender<()>) -> Running {
        let (tx, rx) = mpsc::channel(1);
        let detect = tokio::spawn(detect_loop(
            self.detector,
            self.interval,
            tx,
            shutdown.subscribe(),
        ));
        let convert = tokio::spawn(convert_loop(self.converter, rx, shutdown.subscribe()));
        Running { detect, convert }
    }
}

async fn detect_loop<S: NoteSource>(
    mut detector: ChangeDetector<S>,
    interval: Duration,
    notes: mpsc::Sender<Note>,
    mut shutdown: broadcast::Receiver<()>,
) {
    debug!("starting change detection");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                for note in detector.poll() {
                    tokio::select! {
                        sent = notes.send(note) => {
                            if sent.is_err() {
                                info!("converter gone, change detection exiting");
                                return;
                            }
                        }
                        _ = shutdown.recv() => {
                            info!("change detection exiting");
                            return;
                        }
                    }
                }
            }
        }
    }
    info!("change detection exiting");
}

async fn convert_loop(
    converter: Converter,
    mut notes: mpsc::Receiver<Note>,
    mut shutdown: broadcast::Receiver<()>,
) {
    debug!("starting conversion");
    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            note = notes.recv() => {
                let Some(note) = note else { break };
                if let Err(e) = converter.apply(&note) {
                    error!(title = %note.title, error = %e, "conversion failed");
                }
            }
        }
    }
    info!("conversion exiting");
}

/// Outcome of a one-shot [`sync_all`].
#[derive(Debug, Default)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    /// Titles of notes without a body.
    pub skipped: Vec<String>,
    /// Title and error message of notes that could not be written.
    pub failed: Vec<(String, String)>,
}

/// Convert every note currently carrying `marker`, ignoring change detection.
///
/// Only the query failing is an error; per-note failures are collected in
/// the report.
pub fn sync_all<S: NoteSource>(
    source: &S,
    marker: &str,
    converter: &Converter,
) -> Result<SyncReport, SourceError> {
    let mut report = SyncReport::default();
    for note in source.tagged_notes(marker)? {
        match converter.apply(&note) {
            Ok(Conversion::Written(path)) => report.written.push(path),
            Ok(Conversion::Skipped) => report.skipped.push(note.title),
            Err(e) => report.failed.push((note.title, e.to_string())),
        }
    }
    Ok(report)
}
