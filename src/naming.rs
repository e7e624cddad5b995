//! Post file naming.
//!
//! A note's title decides where its post lives: the title is lowercased and
//! spaces become dashes, so `My Best Photos` is written to
//! `my-best-photos.md`. Nothing else is rewritten; punctuation survives as-is,
//! which keeps the mapping predictable for anyone looking for a post by hand.

/// URL slug for a note title.
///
/// - `"Note Title"` → `"note-title"`
/// - `"Rust 2024: Notes"` → `"rust-2024:-notes"`
/// - `"already-slugged"` → `"already-slugged"`
pub fn post_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// File name of the post for a note title.
pub fn post_filename(title: &str) -> String {
    format!("{}.md", post_slug(title))
}
