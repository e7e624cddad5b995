//! Hugo post rendering.
//!
//! A converted note becomes a Markdown file with YAML front matter:
//!
//! ```text
//! ---
//! title: "Note Title"
//! date: 2019-04-29T07:55:21-07:00
//! categories: ["Rust","Tooling"]
//! tags: ["Rust","Tooling"]
//! draft: false
//! aliases: ["/old-url"]
//! ---
//! <body>
//! ```
//!
//! `categories` and `tags` are toggled independently by [`TaxonomyConfig`]; when
//! both are on they carry the same list. Preserved lines from a previous
//! version of the file follow `draft` verbatim.

use crate::config::TaxonomyConfig;

/// Everything needed to write one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    /// ISO-8601 timestamp with offset.
    pub date: String,
    pub body: String,
    pub tags: Vec<String>,
    pub draft: bool,
    /// Unmanaged front matter lines carried over from the existing post.
    pub preserved: Vec<String>,
}

/// Render `doc` as a Hugo Markdown file.
pub fn render(doc: &Document, taxonomy: &TaxonomyConfig) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("title: \"{}\"\n", escape(&doc.title)));
    out.push_str(&format!("date: {}\n", doc.date));
    if taxonomy.categories {
        out.push_str(&format!("categories: [{}]\n", quoted_list(&doc.tags)));
    }
    if taxonomy.tags {
        out.push_str(&format!("tags: [{}]\n", quoted_list(&doc.tags)));
    }
    out.push_str(&format!("draft: {}\n", doc.draft));
    for line in &doc.preserved {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("---\n");
    out.push_str(&doc.body);
    out
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", escape(item)))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document {
            title: "Note Title".into(),
            date: "2019-04-29T07:55:21-07:00".into(),
            body: "\nBody text".into(),
            tags: vec!["Tag".into()],
            draft: false,
            preserved: Vec::new(),
        }
    }

    fn both() -> TaxonomyConfig {
        TaxonomyConfig {
            categories: true,
            tags: true,
        }
    }

    #[test]
    fn renders_full_front_matter() {
        let expected = "---
title: \"Note Title\"
date: 2019-04-29T07:55:21-07:00
categories: [\"Tag\"]
tags: [\"Tag\"]
draft: false
---

Body text";
        assert_eq!(render(&doc(), &both()), expected);
    }

    #[test]
    fn list_fields_follow_taxonomy() {
        let categories_only = TaxonomyConfig {
            categories: true,
            tags: false,
        };
        let out = render(&doc(), &categories_only);
        assert!(out.contains("categories: [\"Tag\"]\n"));
        assert!(!out.contains("tags:"));

        let neither = TaxonomyConfig {
            categories: false,
            tags: false,
        };
        let out = render(&doc(), &neither);
        assert!(!out.contains("categories:"));
        assert!(!out.contains("tags:"));
    }

    #[test]
    fn multiple_tags_are_comma_joined() {
        let mut d = doc();
        d.tags = vec!["Rust".into(), "Long Read".into()];
        let out = render(&d, &both());
        assert!(out.contains("categories: [\"Rust\",\"Long Read\"]\n"));
    }

    #[test]
    fn empty_tag_list_renders_empty_brackets() {
        let mut d = doc();
        d.tags.clear();
        assert!(render(&d, &both()).contains("tags: []\n"));
    }

    #[test]
    fn preserved_lines_follow_draft() {
        let mut d = doc();
        d.draft = true;
        d.preserved = vec!["custom: abc".into(), "slug: other".into()];
        let out = render(&d, &both());
        assert!(out.contains("draft: true\ncustom: abc\nslug: other\n---\n"));
    }

    #[test]
    fn quotes_in_title_are_escaped() {
        let mut d = doc();
        d.title = r#"Say "hi""#.into();
        assert!(render(&d, &both()).contains(r#"title: "Say \"hi\"""#));
    }
}
