/*!
 * Tests for output rendering
 */

use anyhow::Result;

use screenmark::annotation::{annotate, AnnotationKind, Entry};
use screenmark::app_config::{RenderConfig, RenderFormat};
use screenmark::render::ScriptRenderer;
use crate::common;

/// Test that text output carries a kind gutter in front of each line
#[test]
fn test_render_text_shouldPrefixKindGutter() -> Result<()> {
    let script = annotate("INT. VOID - DAY\n")?;
    let renderer = ScriptRenderer::with_format(RenderFormat::Text);

    let output = renderer.render(&script)?;

    assert_eq!(output, format!("{:<10} | INT. VOID - DAY\n", "scene"));
    Ok(())
}

/// Test that text output preserves the entry's own indentation
#[test]
fn test_render_text_shouldPreserveContentIndentation() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;
    let renderer = ScriptRenderer::with_format(RenderFormat::Text);

    let output = renderer.render(&script)?;

    // One line per entry, character cues still sit in their column
    assert_eq!(output.lines().count(), script.len());
    assert!(output.contains("|                       JOAN\n"));
    Ok(())
}

/// Test that colored output wraps only the gutter in ANSI escapes
#[test]
fn test_render_text_withColor_shouldColorizeGutterOnly() -> Result<()> {
    let script = annotate("INT. VOID - DAY\n\n        zzz qqq unplaceable\n")?;
    let renderer = ScriptRenderer::new(RenderConfig {
        format: RenderFormat::Text,
        color: true,
    });

    let output = renderer.render(&script)?;
    let mut lines = output.lines();

    let scene_line = lines.next().unwrap();
    assert!(scene_line.starts_with("\x1B[1;32m"), "scene gutter should be green");
    assert!(scene_line.ends_with("INT. VOID - DAY"), "content must stay unwrapped");

    let unknown_line = lines.next().unwrap();
    assert!(unknown_line.starts_with("\x1B[1;31m"), "unknown gutter should be red");

    Ok(())
}

/// Test that JSON output deserializes back into the same entries
#[test]
fn test_render_json_shouldSerializeEntries() -> Result<()> {
    let script = annotate(common::sample_script_markup())?;
    let renderer = ScriptRenderer::with_format(RenderFormat::Json);

    let output = renderer.render(&script)?;
    let parsed: Vec<Entry> = serde_json::from_str(&output)?;

    assert_eq!(parsed.len(), script.len());
    assert_eq!(parsed[0].annotation, AnnotationKind::Meta);
    assert_eq!(parsed[4].annotation, AnnotationKind::Scene);
    assert_eq!(parsed[4].plain_text(), "INT. DINER - NIGHT");

    // Kind labels use the snake_case wire names
    assert!(output.contains("\"speech_cue\""));

    Ok(())
}

/// Test that files never contain ANSI escapes, whatever the config says
#[test]
fn test_write_to_file_withColorConfig_shouldNotEmbedAnsi() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let out_path = temp_dir.path().join("colored").join("out.txt");

    let script = annotate(common::sample_script_markup())?;
    let renderer = ScriptRenderer::new(RenderConfig {
        format: RenderFormat::Text,
        color: true,
    });

    renderer.write_to_file(&script, &out_path)?;

    // Parent directory is created on demand
    assert!(out_path.exists());

    let content = std::fs::read_to_string(&out_path)?;
    assert!(!content.contains('\x1B'));
    assert_eq!(content.lines().count(), script.len());

    Ok(())
}

/// Test the format accessor on a renderer built from a bare format
#[test]
fn test_with_format_shouldExposeConfiguredFormat() {
    let renderer = ScriptRenderer::with_format(RenderFormat::Json);
    assert_eq!(*renderer.format(), RenderFormat::Json);
}
