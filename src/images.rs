//! Bear image embeds → Hugo Markdown images.
//!
//! Bear stores an embedded image as a line like
//! `[image:7BD34BA7-...-0000B3447A4CA4D0/img.jpg]`: a per-note attachment
//! directory and a filename. Hugo serves images from a static path instead,
//! so the embed is rewritten to `![caption](/img/posts/img.jpg)`.
//!
//! Captions are by convention written on the line right after the image, in
//! italics or bold (`*A caption*`). That line is left in place and its text
//! is copied into the image's alt text. Any other following line yields an
//! empty alt text.

use tracing::warn;

const MARKER: &str = "[image:";
const CAPTION_PLACEHOLDER: &str = "--caption--";

/// Rewrite image embeds in `lines` in place.
///
/// No lines are added or removed. `image_dir` is the site path images are
/// served from (e.g. `/img/posts`).
pub fn rewrite_images(lines: &mut [String], image_dir: &str) {
    let mut caption_pending = false;

    for i in 0..lines.len() {
        if caption_pending {
            caption_pending = false;
            let caption = if lines[i].starts_with('*') {
                lines[i].trim_matches('*').to_string()
            } else {
                String::new()
            };
            lines[i - 1] = lines[i - 1].replace(CAPTION_PLACEHOLDER, &caption);
            continue;
        }

        if !lines[i].contains(MARKER) {
            continue;
        }

        let line = &lines[i];
        let parts: Vec<&str> = line.split('/').collect();
        if parts.len() != 2 {
            warn!(line = %line, "could not parse image line");
            continue;
        }

        let name = parts[1].trim();
        let name = name.strip_suffix(']').unwrap_or(name);
        let embed = format!("![{CAPTION_PLACEHOLDER}]({image_dir}/{name})");
        lines[i] = embed;
        caption_pending = true;
    }

    // An image on the last line has no caption line to consume.
    if caption_pending && let Some(last) = lines.last_mut() {
        *last = last.replace(CAPTION_PLACEHOLDER, "");
    }
}
