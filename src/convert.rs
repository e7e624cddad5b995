//! Bear note → Hugo post conversion.
//!
//! A publishable Bear note looks like this:
//!
//! ```text
//! # Note Title                       ← line 0: heading, dropped
//! #blog/rust #blog/long read#        ← line 1: tags
//!                                    ← line 2..: body
//! [image:7BD34BA7-.../photo.jpg]
//! *The caption*
//! ```
//!
//! [`Converter::prepare`] turns it into a [`Post`] without touching the disk;
//! [`Converter::apply`] also merges any hand-written front matter from the
//! existing post and writes the result.

use crate::config::{Config, TaxonomyConfig};
use crate::frontmatter::{ManagedFields, preserved_front_matter};
use crate::images::rewrite_images;
use crate::naming::post_filename;
use crate::render::{Document, render};
use crate::tags::scan_tags;
use crate::types::Note;
use chrono::{DateTime, FixedOffset, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Hugo's date layout: ISO-8601 with a numeric offset.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// A converted note, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub tags: Vec<String>,
    pub draft: bool,
    pub body: String,
    /// Destination file name, e.g. `note-title.md`.
    pub filename: String,
}

/// What [`Converter::apply`] did with a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Written(PathBuf),
    /// Note has no body below its heading and tag line.
    Skipped,
}

/// Settings the converter needs, taken from [`Config`] once at startup.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub content_dir: PathBuf,
    pub image_dir: String,
    pub note_tag: String,
    pub taxonomy: TaxonomyConfig,
}

impl ConvertSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content_dir: config.content_path(),
            image_dir: config.hugo.image_dir.clone(),
            note_tag: config.note_tag.clone(),
            taxonomy: config.taxonomy,
        }
    }
}

type Clock = Box<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Converts notes and writes them into the Hugo content directory.
pub struct Converter {
    settings: ConvertSettings,
    managed: ManagedFields,
    clock: Clock,
}

impl Converter {
    pub fn new(settings: ConvertSettings) -> Self {
        let managed = ManagedFields::new(&settings.taxonomy);
        Self {
            settings,
            managed,
            clock: Box::new(|| Local::now().fixed_offset()),
        }
    }

    /// Replace the wall clock used for post dates.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<FixedOffset> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Convert a note in memory. Returns `None` for notes with fewer than
    /// three lines (heading and tags only).
    pub fn prepare(&self, note: &Note) -> Option<Post> {
        let text = match String::from_utf8(straighten_quotes(&note.body)) {
            Ok(text) => text,
            Err(e) => {
                warn!(title = %note.title, "note is not valid UTF-8, replacing invalid bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.len() < 3 {
            return None;
        }

        let tags = scan_tags(lines[1].as_bytes(), &self.settings.note_tag);
        let draft = tags.iter().any(|t| t.to_lowercase().contains("draft"));

        rewrite_images(&mut lines[2..], &self.settings.image_dir);

        Some(Post {
            title: note.title.clone(),
            tags,
            draft,
            body: lines[2..].join("\n"),
            filename: post_filename(&note.title),
        })
    }

    /// Destination path of a post.
    pub fn post_path(&self, post: &Post) -> PathBuf {
        self.settings.content_dir.join(&post.filename)
    }

    /// Convert a note and write it, keeping unmanaged front matter from the
    /// previous version of the post.
    pub fn apply(&self, note: &Note) -> Result<Conversion, ConvertError> {
        let Some(post) = self.prepare(note) else {
            warn!(title = %note.title, "note has no body, skipping");
            return Ok(Conversion::Skipped);
        };

        let path = self.post_path(&post);
        let preserved = match read_existing(&path)? {
            Some(existing) => preserved_front_matter(&existing, &self.managed),
            None => Vec::new(),
        };

        let doc = Document {
            title: post.title,
            date: (self.clock)().format(DATE_FORMAT).to_string(),
            body: post.body,
            tags: post.tags,
            draft: post.draft,
            preserved,
        };

        fs::write(&path, render(&doc, &self.settings.taxonomy)).map_err(|source| {
            ConvertError::Write {
                path: path.clone(),
                source,
            }
        })?;

        info!(title = %doc.title, path = %path.display(), "wrote post");
        Ok(Conversion::Written(path))
    }
}

const LEFT_QUOTE: &[u8] = "\u{201C}".as_bytes();
const RIGHT_QUOTE: &[u8] = "\u{201D}".as_bytes();

/// Replace curly double quotes with `"`, leaving every other byte as is.
fn straighten_quotes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let rest = &raw[i..];
        if rest.starts_with(LEFT_QUOTE) || rest.starts_with(RIGHT_QUOTE) {
            out.push(b'"');
            i += LEFT_QUOTE.len();
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    out
}

/// Read a post if it exists. A missing file is `Ok(None)`.
fn read_existing(path: &Path) -> Result<Option<String>, ConvertError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConvertError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
