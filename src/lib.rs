//! # bhugo
//!
//! Publish [Bear](https://bear.app) notes as [Hugo](https://gohugo.io) posts.
//! bhugo watches Bear's local database for notes carrying a root tag
//! (`#blog` by default) and rewrites the matching Hugo post every time such a
//! note is edited.
//!
//! # Architecture: Watch Pipeline
//!
//! ```text
//! Bear SQLite ──► ChangeDetector ──► mpsc(1) ──► Converter ──► content/blog/*.md
//!   (source)        (detect)                      (convert)
//! ```
//!
//! Detection and conversion run as two tokio tasks (see [`watch`]). The
//! conversion itself is a chain of small pure transforms:
//!
//! 1. smart quotes → straight quotes,
//! 2. line 1 of the note → tags ([`tags`]),
//! 3. Bear image embeds → Markdown images ([`images`]),
//! 4. hand-written front matter of the existing post → kept ([`frontmatter`]),
//! 5. everything → the post file ([`render`]).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Bear database access behind the [`source::NoteSource`] trait |
//! | [`detect`] | Byte-for-byte change detection with a per-title cache |
//! | [`convert`] | Note → post conversion and writing |
//! | [`watch`] | The two-task watch loop and one-shot sync |
//! | [`tags`] | Hashtag scanner, including multi-word `#tags like this#` |
//! | [`images`] | `[image:...]` → `![caption](...)` rewriting |
//! | [`frontmatter`] | Managed field set and preservation of foreign lines |
//! | [`render`] | Front matter + body rendering |
//! | [`naming`] | Title → post file name |
//! | [`config`] | Layered TOML / environment configuration |
//! | [`output`] | CLI output formatting |
//! | [`types`] | The [`types::Note`] record shared by all stages |
//!
//! # Design Decisions
//!
//! ## One Direction Only
//!
//! Bear is the source of truth. Posts are regenerated from notes, never the
//! other way round; editing a post's body in the Hugo tree is lost on the next
//! change to the note. Front matter is the exception: lines bhugo does not
//! manage survive regeneration, so `aliases:` and friends can be added by hand.
//!
//! ## Polling Over Notifications
//!
//! Bear exposes no change API and its database is written through Core Data.
//! A one-second poll of a single indexed table is cheap, and comparing full
//! note text catches every edit without relying on modification dates.

pub mod config;
pub mod convert;
pub mod detect;
pub mod frontmatter;
pub mod images;
pub mod naming;
pub mod output;
pub mod render;
pub mod source;
pub mod tags;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
