/*!
 * Entry construction from normalized text.
 *
 * Splits normalized text into logical entries. A physical line that sits
 * directly under its predecessor at the same indentation, with no blank
 * line between them, is a wrapped continuation and is merged into the
 * previous entry. Blank lines and block markers never become entries
 * themselves; they act as separators.
 */

use super::entry::{Entry, leading_whitespace};

/// Structural markers left behind by page extraction. They carry no
/// content and only delimit the script body.
const BLOCK_MARKERS: [&str; 2] = ["<pre>", "</pre>"];

/// Build the logical entry sequence from normalized text.
///
/// Output order follows input order. The sequence may be empty when the
/// text holds nothing but whitespace and markers.
pub fn build_entries(text: &str) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut blank_run = 0usize;
    let mut previous_indent: Option<usize> = None;

    for raw_line in text.lines() {
        if BLOCK_MARKERS.contains(&raw_line.trim()) {
            continue;
        }
        let line = strip_markers(raw_line);
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }

        let indent = leading_whitespace(&line);
        if blank_run == 0 && previous_indent == Some(indent) {
            if let Some(previous) = entries.last_mut() {
                previous.content.push(' ');
                previous.content.push_str(line.trim());
                continue;
            }
        }

        entries.push(Entry::new(line));
        previous_indent = Some(indent);
        blank_run = 0;
    }

    entries
}

/// Remove block markers embedded inside a content line.
fn strip_markers(line: &str) -> String {
    let mut cleaned = line.to_string();
    for marker in BLOCK_MARKERS {
        if cleaned.contains(marker) {
            cleaned = cleaned.replace(marker, "");
        }
    }
    cleaned
}
