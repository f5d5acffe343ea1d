/*!
 * Speech propagation.
 *
 * Dialogue is recognized by position, not by content: it follows a
 * character cue or a parenthetical cue. The first sweep claims unknown
 * successors of Character entries and collects where dialogue actually
 * sits on the page. The second sweep extends the claim to successors of
 * speech cues, but only at indentations the first sweep has confirmed,
 * so a cue at an odd position cannot drag arbitrary text into dialogue.
 * A final catch-all runs late in the pipeline and forces any leftover
 * revisable successor of a Character entry to Speech.
 */

use log::debug;

use super::entry::{AnnotationKind, Entry, Lock};
use super::indentation::IndentHistogram;

/// Two-sweep propagation: Character successors first, then cue successors
/// at confirmed dialogue indentations.
pub fn propagate(entries: &mut [Entry]) {
    let mut after_character = IndentHistogram::new();
    for index in 1..entries.len() {
        if entries[index - 1].annotation != AnnotationKind::Character {
            continue;
        }
        if entries[index].annotation == AnnotationKind::Unknown {
            after_character.record(entries[index].indentation());
            entries[index].annotate(AnnotationKind::Speech, Lock::Soft);
        }
    }

    let mut after_cue = IndentHistogram::new();
    let mut cue_successors: Vec<usize> = Vec::new();
    for index in 1..entries.len() {
        if entries[index - 1].annotation == AnnotationKind::SpeechCue {
            after_cue.record(entries[index].indentation());
            cue_successors.push(index);
        }
    }

    let overlaps = after_cue.keys().any(|key| after_character.contains(key));
    if !overlaps {
        if !after_cue.is_empty() {
            debug!("Cue successors never align with confirmed dialogue; leaving them untouched");
        }
        return;
    }

    for index in cue_successors {
        if entries[index].annotation != AnnotationKind::Unknown {
            continue;
        }
        if after_character.contains(entries[index].indentation()) {
            entries[index].annotate(AnnotationKind::Speech, Lock::Soft);
        }
    }
}

/// Late catch-all: any revisable entry directly following a Character
/// entry that is not already part of a dialogue block becomes Speech.
pub fn backfill_after_characters(entries: &mut [Entry]) {
    for index in 1..entries.len() {
        if entries[index - 1].annotation != AnnotationKind::Character {
            continue;
        }
        if entries[index].is_hard_locked() {
            continue;
        }
        if matches!(
            entries[index].annotation,
            AnnotationKind::Speech | AnnotationKind::Character | AnnotationKind::SpeechCue
        ) {
            continue;
        }
        entries[index].annotate(AnnotationKind::Speech, Lock::Soft);
    }
}
