/*!
 * Postprocessing corrector.
 *
 * Two Character entries in a row cannot both be cues: one of them is a
 * wrapped name fragment or a misfiled dialogue line. Each adjacent pair
 * is resolved by keeping an entry whose indentation matches the
 * script-wide Character mean exactly, else the one at the lower
 * indentation; at equal indentation the shorter content wins. A later
 * loser becomes Speech, an earlier loser is returned to Unknown.
 */

use super::entry::{AnnotationKind, Entry, Lock};

/// Resolve runs of adjacent Character entries, left to right, against the
/// mean Character indentation computed before any change is made.
pub fn resolve_duplicate_cues(entries: &mut [Entry]) {
    let Some(target) = mean_indentation(entries, AnnotationKind::Character) else {
        return;
    };
    let target = target.round() as usize;

    for index in 1..entries.len() {
        if entries[index - 1].annotation != AnnotationKind::Character
            || entries[index].annotation != AnnotationKind::Character
        {
            continue;
        }
        if earlier_wins(&entries[index - 1], &entries[index], target) {
            entries[index].annotate(AnnotationKind::Speech, Lock::Soft);
        } else {
            entries[index - 1].annotate(AnnotationKind::Unknown, Lock::Soft);
        }
    }
}

/// Mean indentation over all entries of one kind.
fn mean_indentation(entries: &[Entry], kind: AnnotationKind) -> Option<f64> {
    let mut sum = 0usize;
    let mut count = 0usize;
    for entry in entries {
        if entry.annotation == kind {
            sum += entry.indentation();
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Pick the pair member that keeps Character status. An exact match
/// with the mean wins outright; otherwise the lower indentation does.
/// At equal indentation the shorter content is the likelier cue, and an
/// exact tie keeps the earlier entry.
fn earlier_wins(earlier: &Entry, later: &Entry, target: usize) -> bool {
    let earlier_indent = earlier.indentation();
    let later_indent = later.indentation();
    if earlier_indent != later_indent {
        if earlier_indent == target {
            return true;
        }
        if later_indent == target {
            return false;
        }
        return earlier_indent < later_indent;
    }
    earlier.content.chars().count() <= later.content.chars().count()
}
