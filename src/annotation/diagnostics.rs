/*!
 * Post-annotation diagnostics.
 *
 * Read-only inspection of a finished annotation: dialogue anomalies,
 * entries no pass could place, and how often each character speaks.
 * The report is the tool's honesty layer; a heuristic pipeline that
 * cannot say where it failed is not worth much.
 */

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::entry::{AnnotationKind, Entry, Lock};
use super::lexicon::clean_name;

/// A Character entry whose successor is not dialogue.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechAnomaly {
    /// Position of the offending successor
    pub index: usize,
    /// The character cue content
    pub cue: String,
    /// The successor content
    pub following: String,
    /// What the successor ended up as
    pub kind: AnnotationKind,
}

/// Lock-level tally over the final sequence.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LockTally {
    pub unset: usize,
    pub soft: usize,
    pub hard: usize,
}

/// Summary of what the pipeline could and could not place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticsReport {
    /// Character entries not followed by Speech or SpeechCue
    pub speech_anomalies: Vec<SpeechAnomaly>,
    /// Positions and contents of entries left Unknown
    pub unknown_entries: Vec<(usize, String)>,
    /// Cleaned, upper-cased character names with cue counts, most
    /// frequent first
    pub character_frequencies: Vec<(String, usize)>,
    /// How confident the final assignment is
    pub lock_tally: LockTally,
}

impl DiagnosticsReport {
    /// Build the report from a finished sequence. Never mutates.
    pub fn generate(entries: &[Entry]) -> Self {
        let mut report = DiagnosticsReport::default();

        for (index, entry) in entries.iter().enumerate() {
            match entry.lock() {
                Lock::Unset => report.lock_tally.unset += 1,
                Lock::Soft => report.lock_tally.soft += 1,
                Lock::Hard => report.lock_tally.hard += 1,
            }
            if entry.annotation == AnnotationKind::Unknown {
                report
                    .unknown_entries
                    .push((index, entry.trimmed().to_string()));
            }
            if index > 0 && entries[index - 1].annotation == AnnotationKind::Character {
                let ok = matches!(
                    entry.annotation,
                    AnnotationKind::Speech | AnnotationKind::SpeechCue
                );
                if !ok {
                    report.speech_anomalies.push(SpeechAnomaly {
                        index,
                        cue: entries[index - 1].trimmed().to_string(),
                        following: entry.trimmed().to_string(),
                        kind: entry.annotation,
                    });
                }
            }
        }

        let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
        for entry in entries {
            if entry.annotation != AnnotationKind::Character {
                continue;
            }
            let name = clean_name(&entry.content);
            if !name.is_empty() {
                *frequencies.entry(name.to_uppercase()).or_insert(0) += 1;
            }
        }
        report.character_frequencies = frequencies.into_iter().collect();
        report
            .character_frequencies
            .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        report
    }

    /// Whether the annotation has nothing to complain about.
    pub fn is_clean(&self) -> bool {
        self.speech_anomalies.is_empty() && self.unknown_entries.is_empty()
    }

    /// One-line summary for logging.
    pub fn summary(&self) -> String {
        format!(
            "{} character(s), {} anomaly(ies), {} unknown entr(y/ies)",
            self.character_frequencies.len(),
            self.speech_anomalies.len(),
            self.unknown_entries.len()
        )
    }
}

impl fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Characters:")?;
        for (name, count) in &self.character_frequencies {
            writeln!(f, "  {:>5}  {}", count, name)?;
        }
        if !self.speech_anomalies.is_empty() {
            writeln!(f, "Speech anomalies:")?;
            for anomaly in &self.speech_anomalies {
                writeln!(
                    f,
                    "  #{} after '{}': [{}] {}",
                    anomaly.index, anomaly.cue, anomaly.kind, anomaly.following
                )?;
            }
        }
        if !self.unknown_entries.is_empty() {
            writeln!(f, "Unplaced entries:")?;
            for (index, content) in &self.unknown_entries {
                writeln!(f, "  #{}: {}", index, content)?;
            }
        }
        write!(
            f,
            "Confidence: {} lexicon-locked, {} inferred, {} unclaimed",
            self.lock_tally.hard, self.lock_tally.soft, self.lock_tally.unset
        )
    }
}
