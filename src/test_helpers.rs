//! Shared test utilities for the bhugo test suite.
//!
//! [`TestSite`] is a throwaway Hugo site: a temp directory with the content
//! directory already created, plus helpers to seed and read posts and to
//! build a [`Converter`] with a fixed clock.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let site = TestSite::default();
//! site.converter().apply(&Note::new("Hello", "# Hello\n#blog\nHi")).unwrap();
//! assert!(site.read_post("hello.md").contains("title: \"Hello\""));
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use crate::config::TaxonomyConfig;
use crate::convert::{ConvertSettings, Converter};
use chrono::DateTime;

/// Date every test converter stamps on its posts.
pub const FIXED_DATE: &str = "2019-04-29T07:55:21-07:00";

pub struct TestSite {
    pub root: TempDir,
    taxonomy: TaxonomyConfig,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new(TaxonomyConfig::default())
    }
}

impl TestSite {
    pub fn new(taxonomy: TaxonomyConfig) -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("content/blog")).unwrap();
        Self { root, taxonomy }
    }

    pub fn settings(&self) -> ConvertSettings {
        ConvertSettings {
            content_dir: self.root.path().join("content/blog"),
            image_dir: "/img/posts".to_string(),
            note_tag: "blog".to_string(),
            taxonomy: self.taxonomy,
        }
    }

    /// Converter writing into this site with dates pinned to [`FIXED_DATE`].
    pub fn converter(&self) -> Converter {
        Converter::new(self.settings())
            .with_clock(|| DateTime::parse_from_rfc3339(FIXED_DATE).unwrap())
    }

    pub fn post_path(&self, filename: &str) -> PathBuf {
        self.root.path().join("content/blog").join(filename)
    }

    pub fn write_post(&self, filename: &str, content: &str) {
        std::fs::write(self.post_path(filename), content).unwrap();
    }

    /// Read a post. Panics with the directory listing if it is missing.
    pub fn read_post(&self, filename: &str) -> String {
        let path = self.post_path(filename);
        std::fs::read_to_string(&path).unwrap_or_else(|e| {
            let present: Vec<String> = std::fs::read_dir(self.root.path().join("content/blog"))
                .map(|dir| {
                    dir.filter_map(Result::ok)
                        .map(|entry| entry.file_name().to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();
            panic!("post '{filename}' not readable ({e}). Present: {present:?}")
        })
    }
}

/// Wait until `done` returns true, panicking after a few seconds.
pub async fn eventually(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
