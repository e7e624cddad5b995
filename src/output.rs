//! CLI output formatting for `check` and `sync`.
//!
//! # Information-First Display
//!
//! Each note is listed by positional index and title, with what bhugo would
//! do with it on indented context lines:
//!
//! ```text
//! Notes tagged #blog
//! 001 Note Title → note-title.md
//!     Tags: Rust, Long Read
//! 002 Work In Progress → work-in-progress.md
//!     Tags: Drafts
//!     Draft
//! 003 Stub
//!     Skipped: no body below the tag line
//!
//! 3 notes, 2 publishable
//! ```
//!
//! Format functions return `Vec<String>` and do no I/O; `print_*` wrappers
//! write them to stdout.

use crate::convert::Post;
use crate::watch::SyncReport;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format the `check` listing. `notes` pairs each title with its converted
/// post, or `None` when the note would be skipped.
pub fn format_check_output(marker: &str, notes: &[(String, Option<Post>)]) -> Vec<String> {
    let mut lines = vec![format!("Notes tagged {marker}")];

    for (i, (title, post)) in notes.iter().enumerate() {
        match post {
            Some(post) => {
                lines.push(format!("{} {} → {}", format_index(i + 1), title, post.filename));
                if !post.tags.is_empty() {
                    lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
                }
                if post.draft {
                    lines.push(format!("{}Draft", indent(1)));
                }
            }
            None => {
                lines.push(format!("{} {}", format_index(i + 1), title));
                lines.push(format!("{}Skipped: no body below the tag line", indent(1)));
            }
        }
    }

    let publishable = notes.iter().filter(|(_, post)| post.is_some()).count();
    lines.push(String::new());
    lines.push(format!(
        "{}, {} publishable",
        plural(notes.len(), "note"),
        publishable
    ));
    lines
}

pub fn print_check_output(marker: &str, notes: &[(String, Option<Post>)]) {
    for line in format_check_output(marker, notes) {
        println!("{}", line);
    }
}

/// Format the `sync` summary. Paths are shown relative to `content_dir`.
pub fn format_sync_output(report: &SyncReport, content_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, path) in report.written.iter().enumerate() {
        let shown = path.strip_prefix(content_dir).unwrap_or(path);
        lines.push(format!("{} {}", format_index(i + 1), shown.display()));
    }
    for title in &report.skipped {
        lines.push(format!("Skipped {title}: no body"));
    }
    for (title, error) in &report.failed {
        lines.push(format!("Failed {title}: {error}"));
    }

    lines.push(format!(
        "Wrote {} to {}",
        plural(report.written.len(), "post"),
        content_dir.display()
    ));
    lines
}

pub fn print_sync_output(report: &SyncReport, content_dir: &Path) {
    for line in format_sync_output(report, content_dir) {
        println!("{}", line);
    }
}
