/*!
 * Entry model for annotated screenplay text.
 *
 * An `Entry` is one logical line of a script (wrapped physical lines are
 * merged by the entry builder) together with the structural role the
 * annotation passes have assigned to it. Layout metrics are derived from
 * the content on demand and never stored, so edits can't leave stale
 * values behind.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BOLD_OPEN: &str = "<b>";
const BOLD_CLOSE: &str = "</b>";

/// Structural role of a screenplay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// No pass claimed the line; a valid terminal state
    Unknown,
    /// Production note, transition or front matter
    Meta,
    /// Scene heading (slug line)
    Scene,
    /// Action / scene description
    Narrative,
    /// Dialogue line
    Speech,
    /// Parenthetical delivery note inside dialogue
    SpeechCue,
    /// Character cue introducing dialogue
    Character,
}

impl AnnotationKind {
    /// All kinds, in a stable reporting order.
    pub const ALL: [AnnotationKind; 7] = [
        AnnotationKind::Scene,
        AnnotationKind::Character,
        AnnotationKind::Speech,
        AnnotationKind::SpeechCue,
        AnnotationKind::Narrative,
        AnnotationKind::Meta,
        AnnotationKind::Unknown,
    ];

    /// Lowercase label used in rendered output and JSON.
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationKind::Unknown => "unknown",
            AnnotationKind::Meta => "meta",
            AnnotationKind::Scene => "scene",
            AnnotationKind::Narrative => "narrative",
            AnnotationKind::Speech => "speech",
            AnnotationKind::SpeechCue => "speech_cue",
            AnnotationKind::Character => "character",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AnnotationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unknown" => Ok(AnnotationKind::Unknown),
            "meta" => Ok(AnnotationKind::Meta),
            "scene" => Ok(AnnotationKind::Scene),
            "narrative" => Ok(AnnotationKind::Narrative),
            "speech" => Ok(AnnotationKind::Speech),
            "speech_cue" | "speechcue" | "cue" => Ok(AnnotationKind::SpeechCue),
            "character" => Ok(AnnotationKind::Character),
            _ => Err(format!("Unknown annotation kind: {}", s)),
        }
    }
}

/// Confidence attached to an annotation.
///
/// `Hard` claims come from the lexicon passes and are immune to later
/// reassignment. `Soft` claims come from structural inference and may be
/// overwritten. The level only ever increases over the life of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Lock {
    /// Never claimed by any pass
    #[default]
    Unset,
    /// Structural claim, later passes may revise it
    Soft,
    /// Lexicon claim, final
    Hard,
}

/// One logical screenplay line plus its assigned role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Raw content with leading whitespace preserved
    pub content: String,
    /// Structural role assigned so far
    pub annotation: AnnotationKind,
    #[serde(skip)]
    pub(crate) lock: Lock,
}

impl Entry {
    /// Create an unannotated entry.
    pub fn new(content: impl Into<String>) -> Self {
        Entry {
            content: content.into(),
            annotation: AnnotationKind::Unknown,
            lock: Lock::Unset,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_kind(content: impl Into<String>, kind: AnnotationKind) -> Self {
        let mut entry = Entry::new(content);
        entry.annotation = kind;
        entry
    }

    /// Assign a role. The lock level never decreases, so a hard claim
    /// survives any later soft reassignment attempt going through
    /// [`Entry::annotate`].
    pub(crate) fn annotate(&mut self, kind: AnnotationKind, lock: Lock) {
        self.annotation = kind;
        if lock > self.lock {
            self.lock = lock;
        }
    }

    /// Whether a lexicon pass has made the current role final.
    pub(crate) fn is_hard_locked(&self) -> bool {
        self.lock == Lock::Hard
    }

    pub(crate) fn lock(&self) -> Lock {
        self.lock
    }

    /// Content with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }

    /// Number of leading whitespace characters. A line with no
    /// non-whitespace characters reports its full length.
    pub fn indentation(&self) -> usize {
        leading_whitespace(&self.content)
    }

    /// Share of cased letters that are uppercase, in `0.0..=1.0`.
    /// A line with no cased letters reports 1.0.
    pub fn upper_case_ratio(&self) -> f64 {
        let mut cased = 0usize;
        let mut upper = 0usize;
        for ch in self.content.chars() {
            if ch.is_uppercase() {
                cased += 1;
                upper += 1;
            } else if ch.is_lowercase() {
                cased += 1;
            }
        }
        if cased == 0 {
            1.0
        } else {
            upper as f64 / cased as f64
        }
    }

    /// Whether the trimmed content is wrapped in a single bold span.
    pub fn is_bold(&self) -> bool {
        let trimmed = self.trimmed();
        if trimmed.len() < BOLD_OPEN.len() + BOLD_CLOSE.len() {
            return false;
        }
        if !trimmed.starts_with(BOLD_OPEN) || !trimmed.ends_with(BOLD_CLOSE) {
            return false;
        }
        let inner = &trimmed[BOLD_OPEN.len()..trimmed.len() - BOLD_CLOSE.len()];
        !inner.contains(BOLD_CLOSE)
    }

    /// Content with bold markup removed and surrounding whitespace trimmed.
    pub fn plain_text(&self) -> String {
        strip_bold(&self.content).trim().to_string()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.annotation, self.trimmed())
    }
}

/// Count leading whitespace characters; an all-whitespace string reports
/// its full character length.
pub(crate) fn leading_whitespace(text: &str) -> usize {
    let mut leading = 0usize;
    for ch in text.chars() {
        if ch.is_whitespace() {
            leading += 1;
        } else {
            return leading;
        }
    }
    leading
}

/// Remove bold markup without touching anything else.
pub(crate) fn strip_bold(text: &str) -> String {
    text.replace(BOLD_OPEN, "").replace(BOLD_CLOSE, "")
}
