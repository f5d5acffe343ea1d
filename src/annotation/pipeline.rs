/*!
 * Annotation pipeline assembly.
 *
 * Runs the passes in their fixed order: normalize, build entries, seed
 * from indentation clusters, lexicon marking, speech propagation,
 * narrative inference, cleanup and boundary sealing, the late speech
 * catch-all, duplicate-cue correction, and finally diagnostics. Every
 * pass operates on the whole sequence by index; the sequence owns its
 * entries and no references are held across passes.
 */

use log::debug;

use super::builder;
use super::cleanup;
use super::correct;
use super::diagnostics::DiagnosticsReport;
use super::entry::{AnnotationKind, Entry};
use super::indentation;
use super::lexicon;
use super::narrative;
use super::preprocess;
use super::speech;
use crate::errors::ScriptError;

/// A fully annotated script: the entry sequence in original order plus
/// the diagnostics gathered over the final assignment.
#[derive(Debug, Clone)]
pub struct AnnotatedScript {
    entries: Vec<Entry>,
    diagnostics: DiagnosticsReport,
}

impl AnnotatedScript {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn diagnostics(&self) -> &DiagnosticsReport {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry counts per kind, in reporting order.
    pub fn kind_counts(&self) -> Vec<(AnnotationKind, usize)> {
        AnnotationKind::ALL
            .iter()
            .map(|&kind| {
                let count = self
                    .entries
                    .iter()
                    .filter(|entry| entry.annotation == kind)
                    .count();
                (kind, count)
            })
            .collect()
    }
}

/// Annotate raw script markup.
///
/// Returns [`ScriptError::EmptyDocument`] when normalization leaves no
/// entries to annotate; every other input produces a result, however
/// many entries end up Unknown.
pub fn annotate(raw: &str) -> Result<AnnotatedScript, ScriptError> {
    let normalized = preprocess::normalize(raw);
    let mut entries = builder::build_entries(&normalized);
    if entries.is_empty() {
        return Err(ScriptError::EmptyDocument);
    }
    debug!("Built {} entries", entries.len());

    let seeding = indentation::seed_clusters(&mut entries);
    if !seeding.accepted {
        debug!("Proceeding without indentation seeds");
    }

    lexicon::mark_scene_headings(&mut entries);
    lexicon::mark_speech_cues(&mut entries);
    lexicon::mark_meta_notes(&mut entries);
    speech::propagate(&mut entries);
    narrative::infer(&mut entries);

    let mut entries = cleanup::remove_residue(entries);
    cleanup::seal_front_matter(&mut entries);
    speech::backfill_after_characters(&mut entries);
    correct::resolve_duplicate_cues(&mut entries);

    let diagnostics = DiagnosticsReport::generate(&entries);
    debug!("Annotation finished: {}", diagnostics.summary());
    Ok(AnnotatedScript { entries, diagnostics })
}
