//! Preservation of hand-written front matter.
//!
//! Every conversion regenerates the post from scratch, but users often add
//! fields to a published post by hand (`aliases:`, `slug:`, `images:`...).
//! Before overwriting, the existing file is read and every front matter line
//! whose key bhugo does not manage is carried over verbatim.
//!
//! This is deliberately line-oriented: a line's key is the text before its
//! first `:`, and the block must be delimited by `---` lines. Anything that
//! does not look like that is treated as having no front matter to keep.

use crate::config::TaxonomyConfig;
use std::collections::BTreeSet;

const DELIMITER: &str = "---";

/// Front matter keys regenerated on every conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFields(BTreeSet<&'static str>);

impl ManagedFields {
    /// `title`, `date` and `draft` are always managed; `categories` and
    /// `tags` only when bhugo is configured to write them.
    pub fn new(taxonomy: &TaxonomyConfig) -> Self {
        let mut fields = BTreeSet::from(["title", "date", "draft"]);
        if taxonomy.categories {
            fields.insert("categories");
        }
        if taxonomy.tags {
            fields.insert("tags");
        }
        Self(fields)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

/// Return the front matter lines of `existing` that are not managed.
///
/// Returns an empty list when the document does not open with `---`, or when
/// the closing `---` is missing.
pub fn preserved_front_matter(existing: &str, managed: &ManagedFields) -> Vec<String> {
    let mut lines = existing.split('\n');
    if lines.next() != Some(DELIMITER) {
        return Vec::new();
    }

    let mut preserved = Vec::new();
    for line in lines {
        if line == DELIMITER {
            return preserved;
        }
        let key = line.split(':').next().unwrap_or_default();
        if managed.contains(key) {
            continue;
        }
        preserved.push(line.to_string());
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories_only() -> ManagedFields {
        ManagedFields::new(&TaxonomyConfig {
            categories: true,
            tags: false,
        })
    }

    #[test]
    fn empty_document_has_nothing_to_keep() {
        assert!(preserved_front_matter("", &categories_only()).is_empty());
    }

    #[test]
    fn keeps_unmanaged_lines_in_order() {
        let doc = r#"---
title: "Existing"
date: 2019-04-29T07:55:21-07:00
draft: false
categories: ["blog"]
tags: ["custom-tag"]
custom: abc
---

Body Text"#;
        assert_eq!(
            preserved_front_matter(doc, &categories_only()),
            vec![r#"tags: ["custom-tag"]"#, "custom: abc"]
        );
    }

    #[test]
    fn managed_tags_are_dropped_when_enabled() {
        let managed = ManagedFields::new(&TaxonomyConfig {
            categories: true,
            tags: true,
        });
        let doc = "---\ntags: [\"x\"]\naliases: [\"/old\"]\n---\nbody";
        assert_eq!(preserved_front_matter(doc, &managed), vec![r#"aliases: ["/old"]"#]);
    }

    #[test]
    fn missing_opening_delimiter_keeps_nothing() {
        let doc = "title: \"Existing\"\ncustom: abc\n---\n\nBody Text";
        assert!(preserved_front_matter(doc, &categories_only()).is_empty());
    }

    #[test]
    fn missing_closing_delimiter_keeps_nothing() {
        let doc = "---\ntitle: \"Existing\"\ncustom: abc\n\nBody Text";
        assert!(preserved_front_matter(doc, &categories_only()).is_empty());
    }

    #[test]
    fn lines_without_colon_are_kept_verbatim() {
        let doc = "---\ntitle: \"x\"\n  - nested item\n---\n";
        assert_eq!(
            preserved_front_matter(doc, &categories_only()),
            vec!["  - nested item"]
        );
    }

    #[test]
    fn key_match_is_exact() {
        let doc = "---\ntitles: many\n date: indented\n---\n";
        assert_eq!(
            preserved_front_matter(doc, &categories_only()),
            vec!["titles: many", " date: indented"]
        );
    }

    #[test]
    fn managed_fields_follow_taxonomy() {
        let none = ManagedFields::new(&TaxonomyConfig {
            categories: false,
            tags: false,
        });
        assert!(none.contains("title"));
        assert!(none.contains("draft"));
        assert!(!none.contains("categories"));
        assert!(!none.contains("tags"));
    }
}
