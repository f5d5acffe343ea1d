/*!
 * Cleanup and boundary passes.
 *
 * Residual removal deletes Unknown entries that are nothing but page
 * numbering or separator junk; it is the only pass that changes the
 * length of the sequence, and it preserves the order of what survives.
 * Boundary sealing then marks the contiguous Unknown prefix of the
 * document as front matter.
 */

use super::entry::{AnnotationKind, Entry, Lock};
use super::lexicon::is_residue;

/// Delete Unknown entries whose content is digits, punctuation and
/// whitespace only. Annotated entries are never deleted, whatever their
/// content.
pub fn remove_residue(entries: Vec<Entry>) -> Vec<Entry> {
    entries
        .into_iter()
        .filter(|entry| entry.annotation != AnnotationKind::Unknown || !is_residue(&entry.content))
        .collect()
}

/// Seal the leading run of Unknown entries as Meta. The run ends at the
/// first entry of any other kind; Unknown entries after that point are
/// left for diagnostics to report.
pub fn seal_front_matter(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if entry.annotation != AnnotationKind::Unknown {
            break;
        }
        entry.annotate(AnnotationKind::Meta, Lock::Soft);
    }
}
