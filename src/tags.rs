//! Bear hashtag extraction.
//!
//! Bear marks tags inline: `#blog/rust` is a single-word tag, `#blog/long read#`
//! is a multi-word tag closed by a trailing hash. The second line of every
//! published note carries these tags; [`scan_tags`] turns that line into the
//! list that ends up in the post's `categories` / `tags` front matter.
//!
//! ## Scanning rules
//!
//! The scan is a single pass over the line's bytes. For each byte, with the
//! previous byte and the next byte as context, the first matching rule wins:
//!
//! 1. `#` at line start or after a space, outside a tag: open a tag.
//! 2. `#` not after a space, inside a tag: the tag ends here (multi-word close).
//! 3. space inside a tag, not followed by `#`: remember this as a tentative end
//!    and stop extending the tag (it may be multi-word, or just trailing text).
//! 4. space inside a tag, followed by `#`: emit the tag up to the remembered end.
//! 5. anything else: extend the tag unless a tentative end is pending.
//!
//! A tag still open at the end of the line is emitted with its last end.
//!
//! ```text
//! #blog/abc #blog/def abc#  #def   →   ["Abc", "Def Abc", "Def"]
//! #blog/abc 123 #one 456           →   ["Abc", "One"]
//! ```

/// Explicit scan state. Indices are byte offsets into the scanned line.
#[derive(Debug, Default)]
struct ScanState {
    start: usize,
    end: usize,
    in_hash: bool,
    multi_word: bool,
}

/// Extract the normalized tags from a line of Bear text.
///
/// `namespace` is the root tag (e.g. `blog`); a leading `blog/` is stripped
/// from every tag. Tags are returned in the order they appear, duplicates kept.
pub fn scan_tags(line: &[u8], namespace: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut state = ScanState::default();
    let mut prev: Option<u8> = None;

    for (i, &b) in line.iter().enumerate() {
        let peek = line.get(i + 1).copied();
        let after_space = matches!(prev, None | Some(b' '));

        match b {
            b'#' if after_space && !state.in_hash => {
                state.start = i + 1;
                state.end = state.start;
                state.in_hash = true;
            }
            b'#' if !after_space && state.in_hash => {
                state.end = i;
            }
            b' ' if state.in_hash && peek != Some(b'#') => {
                state.end = i;
                state.multi_word = true;
            }
            b' ' if state.in_hash => {
                tags.push(format_tag(&line[state.start..state.end], namespace));
                state.in_hash = false;
                state.multi_word = false;
            }
            _ if !state.multi_word => {
                state.end = i + 1;
            }
            _ => {}
        }

        prev = Some(b);
    }

    if state.in_hash {
        tags.push(format_tag(&line[state.start..state.end], namespace));
    }

    tags
}

/// Normalize raw tag text: trim, drop a trailing `#`, drop the `namespace/`
/// prefix, then title-case every word.
pub fn format_tag(raw: &[u8], namespace: &str) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    let text = text.strip_suffix('#').unwrap_or(text);
    let prefix = format!("{namespace}/");
    let text = text.strip_prefix(prefix.as_str()).unwrap_or(text);
    title_case(text)
}

/// Upper-case the first letter of every word, leaving the rest untouched.
///
/// A word starts after any separator: whitespace, or ASCII punctuation.
/// `_` and alphanumerics never separate, so `rust_lang` stays one word
/// while `long-read` becomes `Long-Read`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = ' ';
    for c in text.chars() {
        if is_separator(prev) {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = c;
    }
    out
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
