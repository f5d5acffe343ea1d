/*!
 * Unit tests for the annotation pipeline
 *
 * These run the full pass sequence on small scripts whose layout is
 * controlled enough that every expected annotation can be derived by
 * hand from the pass rules.
 */

use anyhow::Result;

use screenmark::annotation::{annotate, AnnotationKind};
use crate::common;

/// Test that the sample script is annotated entry for entry as expected
#[test]
fn test_annotate_sampleScript_shouldProduceExpectedKinds() -> Result<()> {
    use AnnotationKind::*;

    let script = annotate(common::sample_script_markup())?;

    let expected = vec![
        Meta, Meta, Meta, Meta,       // title, byline, author, FADE IN:
        Scene, Narrative,             // diner heading, opening action
        Character, Speech,            // JOAN, wrapped dialogue
        Character, SpeechCue, Speech, // HARRY, parenthetical, dialogue
        Character, Speech,            // JOAN
        Character, Speech,            // HARRY
        Narrative, Scene, Narrative,  // bill action, parking lot, crossing action
        Character, Speech,            // JOAN
        Character, Speech,            // HARRY
        Meta, Scene, Narrative,       // CUT TO:, motel heading, bed action
        Character, Speech,            // JOAN (V.O.)
        Meta,                         // THE END
    ];

    let kinds: Vec<AnnotationKind> = script.entries().iter().map(|e| e.annotation).collect();
    assert_eq!(kinds, expected);

    Ok(())
}

/// Test that the sample script comes out without anomalies or leftovers
#[test]
fn test_annotate_sampleScript_shouldBeClean() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;

    let report = script.diagnostics();
    assert!(report.is_clean(), "expected a clean report, got: {}", report.summary());
    assert!(report.unknown_entries.is_empty());
    assert!(report.speech_anomalies.is_empty());

    // Three scene headings and one parenthetical carry lexicon locks
    assert_eq!(report.lock_tally.hard, 4);
    assert_eq!(report.lock_tally.unset, 0);

    Ok(())
}

/// Test that per-kind counts cover the sample script exactly
#[test]
fn test_kindCounts_sampleScript_shouldMatchExpectedTotals() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;
    assert_eq!(script.len(), 28);

    for (kind, count) in script.kind_counts() {
        let expected = match kind {
            AnnotationKind::Scene => 3,
            AnnotationKind::Character => 7,
            AnnotationKind::Speech => 7,
            AnnotationKind::SpeechCue => 1,
            AnnotationKind::Narrative => 4,
            AnnotationKind::Meta => 6,
            AnnotationKind::Unknown => 0,
        };
        assert_eq!(count, expected, "count mismatch for kind {}", kind);
    }

    Ok(())
}

/// Test that a line following a character cue is claimed as speech
#[test]
fn test_annotate_characterCue_shouldMarkFollowingLineSpeech() -> Result<()> {
    let raw = "          OVER THE HILL\n\
               \n\
               \x20 Quiet fields at dawn. Wren waits by the gate.\n\
               \n\
               INT. FARMHOUSE - DAY\n\
               \n\
               \x20         WREN\n\
               \x20     Morning came early.\n\
               \n\
               \x20         NOAH\n\
               \x20     It always does.\n";

    let script = annotate(raw)?;
    let entries = script.entries();
    assert_eq!(entries.len(), 7);

    assert_eq!(entries[3].trimmed(), "WREN");
    assert_eq!(entries[3].annotation, AnnotationKind::Character);
    assert_eq!(entries[4].annotation, AnnotationKind::Speech);
    assert_eq!(entries[5].annotation, AnnotationKind::Character);
    assert_eq!(entries[6].annotation, AnnotationKind::Speech);

    // the name-dropping action line and the skipped title line
    assert_eq!(entries[1].annotation, AnnotationKind::Narrative);
    assert_eq!(entries[0].annotation, AnnotationKind::Meta);

    Ok(())
}

/// Test that a scene heading keeps its claim even right after a cue
#[test]
fn test_annotate_sceneHeadingAfterCue_shouldStaySceneAndReportAnomaly() -> Result<()> {
    let raw = "          THE LAST REEL\n\
               \n\
               \x20 Juno threads the projector in the dark booth.\n\
               \n\
               INT. BOOTH - NIGHT\n\
               \n\
               \x20         JUNO\n\
               \x20     One more reel.\n\
               \n\
               \x20         JUNO\n\
               \n\
               EXT. ALLEY - NIGHT\n";

    let script = annotate(raw)?;
    let entries = script.entries();

    // the heading is hard-locked, so the late speech catch-all leaves it
    assert_eq!(entries[6].annotation, AnnotationKind::Scene);

    let report = script.diagnostics();
    assert_eq!(report.speech_anomalies.len(), 1);
    assert_eq!(report.speech_anomalies[0].index, 6);
    assert_eq!(report.speech_anomalies[0].cue, "JUNO");
    assert_eq!(report.speech_anomalies[0].kind, AnnotationKind::Scene);

    Ok(())
}

/// Test that page-number residue is deleted from the sequence
#[test]
fn test_annotate_pageNumber_shouldBeRemoved() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;

    assert!(script.entries().iter().all(|e| e.trimmed() != "42."));
    assert_eq!(script.len(), 28);

    Ok(())
}

/// Test that an all-caps shout at the cue column is corrected to speech
#[test]
fn test_annotate_shoutAtCueColumn_shouldResolveToSpeech() -> Result<()> {
    let raw = "          THE LAST CALL\n\
               \n\
               \x20 Joan tends the empty bar alone.\n\
               \n\
               INT. BAR - NIGHT\n\
               \n\
               \x20         JOAN\n\
               \x20     Last call was an hour ago.\n\
               \n\
               \x20         JOAN\n\
               \n\
               \x20         GET OUT OF MY BAR!\n\
               \n\
               \x20     He does not move.\n";

    let script = annotate(raw)?;
    let entries = script.entries();

    // seeding takes both column entries for cues; the corrector keeps the
    // one that looks like a name and demotes the shout
    assert_eq!(entries[5].trimmed(), "JOAN");
    assert_eq!(entries[5].annotation, AnnotationKind::Character);
    assert_eq!(entries[6].trimmed(), "GET OUT OF MY BAR!");
    assert_eq!(entries[6].annotation, AnnotationKind::Speech);

    assert!(script.diagnostics().is_clean());

    Ok(())
}

/// Test that leading unclaimed entries are sealed as front matter
#[test]
fn test_annotate_frontMatter_shouldBecomeMeta() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;
    let entries = script.entries();

    for entry in &entries[0..3] {
        assert_eq!(entry.annotation, AnnotationKind::Meta, "not meta: {}", entry.trimmed());
    }
    assert_eq!(entries[0].plain_text(), "THE LONG NIGHT");

    Ok(())
}

/// Test that transitions and end markers are claimed as meta
#[test]
fn test_annotate_transitions_shouldBecomeMeta() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;

    for marker in ["FADE IN:", "CUT TO:", "THE END"] {
        let entry = script
            .entries()
            .iter()
            .find(|e| e.trimmed() == marker)
            .unwrap_or_else(|| panic!("marker not found: {}", marker));
        assert_eq!(entry.annotation, AnnotationKind::Meta, "wrong kind for {}", marker);
    }

    Ok(())
}

/// Test that wrapped dialogue lines are merged into one entry
#[test]
fn test_annotate_wrappedDialogue_shouldMergeIntoOneEntry() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;

    let merged = script
        .entries()
        .iter()
        .find(|e| e.trimmed().starts_with("You want coffee"))
        .expect("dialogue entry not found");
    assert_eq!(merged.trimmed(), "You want coffee or not? We close at two.");
    assert_eq!(merged.annotation, AnnotationKind::Speech);

    Ok(())
}

/// Test that cue suffixes like (V.O.) merge into one character tally
#[test]
fn test_annotate_characterFrequencies_shouldMergeVoiceOverSuffix() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;

    let frequencies = &script.diagnostics().character_frequencies;
    assert_eq!(
        *frequencies,
        vec![("JOAN".to_string(), 4), ("HARRY".to_string(), 3)]
    );

    Ok(())
}

/// Test that a line no pass can place stays Unknown and is reported
#[test]
fn test_annotate_unplaceableLine_shouldStayUnknown() -> Result<()> {
    let raw = "INT. VOID - DAY\n\n        zzz qqq unplaceable\n";

    let script = annotate(raw)?;
    let entries = script.entries();

    assert_eq!(entries[0].annotation, AnnotationKind::Scene);
    assert_eq!(entries[1].annotation, AnnotationKind::Unknown);

    let report = script.diagnostics();
    assert!(!report.is_clean());
    assert_eq!(
        report.unknown_entries,
        vec![(1, "zzz qqq unplaceable".to_string())]
    );

    Ok(())
}

/// Test that annotation never rewrites the content or its indentation
#[test]
fn test_annotate_shouldPreserveOriginalIndentation() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;

    let cue = script
        .entries()
        .iter()
        .find(|e| e.annotation == AnnotationKind::Character)
        .expect("no character entry");
    assert_eq!(cue.indentation(), 22);
    assert!(cue.content.starts_with("                      "));

    Ok(())
}
