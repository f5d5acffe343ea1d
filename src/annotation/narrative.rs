/*!
 * Narrative inference.
 *
 * Action paragraphs are the only block type that regularly mentions
 * character names in running text. The pass collects the known character
 * names, finds which indentation the name-dropping Unknown entries favor,
 * and claims every Unknown entry at that indentation as Narrative.
 */

use super::entry::{AnnotationKind, Entry, Lock};
use super::indentation::IndentHistogram;
use super::lexicon::clean_name;

/// Claim Unknown entries at the dominant name-mentioning indentation as
/// Narrative. A document without Character entries, or without a single
/// name mention, is left untouched.
pub fn infer(entries: &mut [Entry]) {
    let mut names: Vec<String> = Vec::new();
    for entry in entries.iter() {
        if entry.annotation != AnnotationKind::Character {
            continue;
        }
        let name = clean_name(&entry.content);
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    if names.is_empty() {
        return;
    }

    let mut mentions = IndentHistogram::new();
    for entry in entries.iter() {
        if entry.annotation == AnnotationKind::Unknown && mentions_any(entry, &names) {
            mentions.record(entry.indentation());
        }
    }
    let Some(narrative_indent) = mentions.peak() else {
        return;
    };

    for entry in entries.iter_mut() {
        if entry.annotation == AnnotationKind::Unknown && entry.indentation() == narrative_indent {
            entry.annotate(AnnotationKind::Narrative, Lock::Soft);
        }
    }
}

fn mentions_any(entry: &Entry, names: &[String]) -> bool {
    let haystack = entry.content.to_lowercase();
    names.iter().any(|name| haystack.contains(name.as_str()))
}
