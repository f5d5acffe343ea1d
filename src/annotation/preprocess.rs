/*!
 * Markup normalization for scraped screenplay pages.
 *
 * Scraped script pages arrive with carriage returns, `<br>` variants and
 * bold tags that straddle line boundaries. Normalization rewrites the raw
 * text so that line structure and bold spans are consistent before any
 * entry is built. Running it again on its own output is a no-op for
 * normalized text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("Invalid line break regex")
});

static WHITESPACE_ONLY_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s+\n").expect("Invalid blank run regex")
});

static BOLD_OPEN_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<b>([ \t]+)").expect("Invalid bold whitespace regex")
});

/// Normalize raw page markup into a line-stable form.
///
/// The steps run in a fixed order:
/// 1. drop carriage returns
/// 2. rewrite `<br>` variants to newlines
/// 3. collapse runs of whitespace-only lines to one empty line
/// 4. move a closing bold tag stranded at a line start back to the end of
///    the previous line
/// 5. move whitespace trapped after an opening bold tag in front of it
/// 6. delete empty bold pairs
pub fn normalize(raw: &str) -> String {
    let text = raw.replace('\r', "");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = WHITESPACE_ONLY_LINES.replace_all(&text, "\n\n");
    let text = text.replace("\n</b>", "</b>\n");
    let text = BOLD_OPEN_WHITESPACE.replace_all(&text, "${1}<b>");
    text.replace("<b></b>", "")
}
