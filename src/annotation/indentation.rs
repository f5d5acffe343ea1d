/*!
 * Indentation clustering and structural seeding.
 *
 * Screenplays carry their structure in column position: character cues sit
 * deepest, scene headings at the margin. This pass groups the uppercase
 * and bold population by indentation, checks that the two biggest groups
 * dominate the page the way a formatted script does, and seeds Character
 * and Scene annotations from them. Smaller groups are then promoted to
 * Character whenever they share a cleaned name with an already-seeded one,
 * until no group changes.
 */

use log::debug;
use std::collections::BTreeMap;

use super::entry::{AnnotationKind, Entry, Lock};
use super::lexicon::{clean_name, is_excluded_name};

/// Largest group must exceed this share of all entries.
const MIN_PRIMARY_SHARE: f64 = 0.10;
/// Second group must exceed this share of all entries.
const MIN_SECONDARY_SHARE: f64 = 0.015;
/// Together the two groups must exceed this share of the candidate pool.
const MIN_COMBINED_SHARE: f64 = 0.50;

/// Per-indentation occurrence counts. Backed by an ordered map so that
/// iteration order, and therefore tie-breaking, is deterministic.
#[derive(Debug, Clone, Default)]
pub struct IndentHistogram {
    counts: BTreeMap<usize, usize>,
}

impl IndentHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of an indentation value.
    pub fn record(&mut self, indent: usize) {
        *self.counts.entry(indent).or_insert(0) += 1;
    }

    /// Whether the indentation was recorded at least once.
    pub fn contains(&self, indent: usize) -> bool {
        self.counts.contains_key(&indent)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Recorded indentation values in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.keys().copied()
    }

    /// The indentation with the highest count. Ties resolve to the lowest
    /// indentation.
    pub fn peak(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (&indent, &count) in &self.counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((indent, count)),
            }
        }
        best.map(|(indent, _)| indent)
    }
}

/// Outcome of the clustering pass, used for logging and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    /// Whether the dominance criteria held and seeding ran
    pub accepted: bool,
    /// Number of distinct candidate indentation groups
    pub group_count: usize,
    /// Indentation seeded as Character, when accepted
    pub character_indent: Option<usize>,
    /// Indentation seeded as Scene, when accepted
    pub scene_indent: Option<usize>,
    /// Entries annotated Character, including promoted groups
    pub seeded_characters: usize,
    /// Entries annotated Scene
    pub seeded_scenes: usize,
    /// Smaller groups promoted by shared character names
    pub promoted_groups: usize,
}

/// Group fully-uppercase and bold entries by indentation and seed
/// Character and Scene annotations from the two dominant groups.
///
/// When the document does not look like a formatted script (fewer than
/// two groups, or the dominance shares fail), nothing is annotated and
/// the summary reports the rejection.
pub fn seed_clusters(entries: &mut [Entry]) -> SeedSummary {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.upper_case_ratio() >= 1.0 || entry.is_bold() {
            groups.entry(entry.indentation()).or_default().push(index);
        }
    }

    let mut summary = SeedSummary {
        group_count: groups.len(),
        ..SeedSummary::default()
    };

    if groups.len() < 2 {
        debug!(
            "Indentation clustering rejected: {} candidate group(s)",
            groups.len()
        );
        return summary;
    }

    let candidate_total: usize = groups.values().map(Vec::len).sum();
    // Rank by size descending; equal sizes resolve to the lower indentation
    let mut ranked: Vec<(usize, Vec<usize>)> = groups.into_iter().collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));

    let total = entries.len() as f64;
    let primary = ranked[0].1.len() as f64;
    let secondary = ranked[1].1.len() as f64;
    if primary <= total * MIN_PRIMARY_SHARE
        || secondary <= total * MIN_SECONDARY_SHARE
        || primary + secondary <= candidate_total as f64 * MIN_COMBINED_SHARE
    {
        debug!(
            "Indentation clustering rejected: primary {} / secondary {} of {} entries ({} candidates)",
            ranked[0].1.len(),
            ranked[1].1.len(),
            entries.len(),
            candidate_total
        );
        return summary;
    }

    summary.accepted = true;
    summary.character_indent = Some(ranked[0].0);
    summary.scene_indent = Some(ranked[1].0);

    // Largest group becomes Character. Its first member is conventionally
    // front matter (title line) and stays untouched.
    let mut known_names: Vec<String> = Vec::new();
    for (position, &index) in ranked[0].1.iter().enumerate() {
        if position == 0 {
            continue;
        }
        if is_excluded_name(&entries[index].content) {
            continue;
        }
        entries[index].annotate(AnnotationKind::Character, Lock::Soft);
        summary.seeded_characters += 1;
        remember_name(&mut known_names, &entries[index].content);
    }

    // Second group becomes Scene, unconditionally.
    for &index in &ranked[1].1 {
        entries[index].annotate(AnnotationKind::Scene, Lock::Soft);
        summary.seeded_scenes += 1;
    }

    // Bounded fixed point: promote any remaining group that shares a
    // cleaned name with the known pool. Each round either promotes at
    // least one group or stops, so at most group-count rounds run.
    let mut remaining: Vec<Vec<usize>> = ranked.drain(2..).map(|(_, group)| group).collect();
    loop {
        let mut promoted_any = false;
        let mut unpromoted: Vec<Vec<usize>> = Vec::new();
        for group in remaining {
            let shares_name = group
                .iter()
                .any(|&index| known_names.contains(&clean_name(&entries[index].content)));
            if !shares_name {
                unpromoted.push(group);
                continue;
            }
            for &index in &group {
                if index == 0 {
                    continue;
                }
                if is_excluded_name(&entries[index].content) {
                    continue;
                }
                entries[index].annotate(AnnotationKind::Character, Lock::Soft);
                summary.seeded_characters += 1;
                remember_name(&mut known_names, &entries[index].content);
            }
            summary.promoted_groups += 1;
            promoted_any = true;
        }
        remaining = unpromoted;
        if !promoted_any || remaining.is_empty() {
            break;
        }
    }

    debug!(
        "Indentation clustering accepted: character indent {:?}, scene indent {:?}, {} character(s), {} scene(s), {} promoted group(s)",
        summary.character_indent,
        summary.scene_indent,
        summary.seeded_characters,
        summary.seeded_scenes,
        summary.promoted_groups
    );
    summary
}

fn remember_name(known: &mut Vec<String>, content: &str) {
    let name = clean_name(content);
    if !name.is_empty() && !known.contains(&name) {
        known.push(name);
    }
}
