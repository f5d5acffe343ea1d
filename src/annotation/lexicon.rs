/*!
 * Pattern lexicons for screenplay annotation.
 *
 * Three pattern families are recognized on top of the structural passes:
 * scene headings ("INT.", "EXT." and friends), parenthetical speech cues,
 * and production meta phrases (transitions, shot framing, end markers).
 * Scene and cue matches lock the entry; meta matches stay revisable.
 * The module also owns character-name cleanup and the exclusion rules
 * that keep artifacts out of the name pool.
 */

use regex::Regex;
use std::sync::LazyLock;

use super::entry::{AnnotationKind, Entry, Lock, strip_bold};

static SCENE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:INT\.?(?:[\s./]|$)|EXT\.?(?:[\s./]|$)|INTERIOR\b|EXTERIOR\b|I/E\b|E/I\b)")
        .expect("Invalid scene heading regex")
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([^)]*\)$").expect("Invalid parenthetical regex"));

static META_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:FADE (?:IN|OUT|TO|UP)|FADES |CUT TO|CUT BACK|SMASH CUT|MATCH CUT|QUICK CUT|JUMP CUT|INTERCUT|DISSOLVE|CROSSFADE|WIPE TO|IRIS (?:IN|OUT)|THE END\b|END OF |CLOSE UP|CLOSEUP|CLOSE ON|CLOSE SHOT|ANGLE ON|NEW ANGLE|WIDE SHOT|WIDE ANGLE|AERIAL SHOT|TRACKING SHOT|MOVING SHOT|ESTABLISHING SHOT|INSERT\b|POV\b|TITLE CARD|SUPER:|SUPERIMPOSE|FREEZE FRAME|CONTINUED\b|OMITTED\b)",
    )
    .expect("Invalid meta phrase regex")
});

static TRAILING_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("Invalid name suffix regex"));

static WORD_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w").expect("Invalid word char regex"));

/// Mark scene headings. Applies to every entry not yet hard-locked, so a
/// structural seed can still be corrected by the stronger lexicon claim.
pub fn mark_scene_headings(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if entry.is_hard_locked() {
            continue;
        }
        if SCENE_HEADING.is_match(&entry.plain_text()) {
            entry.annotate(AnnotationKind::Scene, Lock::Hard);
        }
    }
}

/// Mark entries whose whole content is a single parenthetical as speech
/// cues. Only `Unknown` entries are considered.
pub fn mark_speech_cues(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if entry.annotation != AnnotationKind::Unknown {
            continue;
        }
        if PARENTHETICAL.is_match(&entry.plain_text()) {
            entry.annotate(AnnotationKind::SpeechCue, Lock::Hard);
        }
    }
}

/// Mark production phrases (transitions, shot framing, end markers) as
/// meta. Unlocked entries currently Unknown, Character or Scene are
/// eligible; the claim stays soft so later passes may still revise it.
pub fn mark_meta_notes(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if entry.is_hard_locked() {
            continue;
        }
        if !matches!(
            entry.annotation,
            AnnotationKind::Unknown | AnnotationKind::Character | AnnotationKind::Scene
        ) {
            continue;
        }
        if META_PHRASE.is_match(&entry.plain_text()) {
            entry.annotate(AnnotationKind::Meta, Lock::Soft);
        }
    }
}

/// Canonical form of a character name: bold markup removed, trailing
/// parenthetical suffixes like "(CONT'D)" or "(V.O.)" stripped repeatedly,
/// then trimmed and lowercased.
pub fn clean_name(raw: &str) -> String {
    let mut name = strip_bold(raw);
    loop {
        let stripped = TRAILING_PARENTHETICAL.replace(&name, "").into_owned();
        if stripped == name {
            break;
        }
        name = stripped;
    }
    name.trim().to_lowercase()
}

/// Whether a candidate line must never enter the character-name pool:
/// dangling-dash wrap artifacts, wholly parenthesized lines, and lines
/// without a single word character.
pub fn is_excluded_name(content: &str) -> bool {
    let stripped = strip_bold(content);
    let trimmed = stripped.trim();
    trimmed.ends_with('-')
        || (trimmed.starts_with('(') && trimmed.ends_with(')'))
        || !WORD_CHAR.is_match(trimmed)
}

/// Whether a line is page-numbering or separator residue: nothing but
/// digits, punctuation and whitespace once bold markup is gone.
pub fn is_residue(content: &str) -> bool {
    let stripped = strip_bold(content);
    stripped
        .trim()
        .chars()
        .all(|c| c.is_numeric() || c.is_ascii_punctuation() || c.is_whitespace())
}
