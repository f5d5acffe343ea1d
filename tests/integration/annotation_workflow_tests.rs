/*!
 * Integration tests for the end-to-end annotation workflow
 *
 * Each test wires the controller to an in-memory catalog and a mock
 * source, so the full fetch-store-annotate-render path runs without any
 * network access.
 */

use std::fs;
use std::sync::{Arc, Mutex};
use anyhow::Result;
use tokio_test;

use screenmark::annotation::Entry;
use screenmark::app_config::{Config, RenderFormat};
use screenmark::app_controller::Controller;
use screenmark::storage::Catalog;
use crate::common;
use crate::common::mock_sources::{MockScriptSource, SourceCallTracker};

fn controller_with_sample(title: &str) -> Result<(Controller, Arc<Mutex<SourceCallTracker>>)> {
    let source = MockScriptSource::with_sample(title);
    let tracker = source.tracker();
    let controller = Controller::with_components(
        Config::default(),
        Arc::new(source),
        Catalog::new_in_memory()?,
    );
    Ok((controller, tracker))
}

/// Test the full path: refresh the index, then annotate a title to a file
#[test]
fn test_annotationWorkflow_refreshAndAnnotateTitle_shouldWriteAnnotatedFile() -> Result<()> {
    common::init_test_logging();
    let (controller, _tracker) = controller_with_sample("The Long Night")?;
    let temp_dir = common::create_temp_dir()?;
    let out_path = temp_dir.path().join("night.txt");

    let indexed = tokio_test::block_on(controller.refresh_index())?;
    assert_eq!(indexed, 1);

    tokio_test::block_on(controller.annotate_title("The Long Night", Some(out_path.clone()), false))?;

    assert!(out_path.exists());
    let content = fs::read_to_string(&out_path)?;
    assert_eq!(content.lines().count(), 28);
    assert!(content.starts_with("meta"));
    assert!(content.contains("<b>INT. DINER - NIGHT</b>"));
    assert!(content.contains("speech_cue"));

    Ok(())
}

/// Test that a second annotation run reuses the stored script
#[test]
fn test_annotationWorkflow_secondRun_shouldReuseStoredScript() -> Result<()> {
    common::init_test_logging();
    let (controller, tracker) = controller_with_sample("The Long Night")?;
    let temp_dir = common::create_temp_dir()?;

    tokio_test::block_on(controller.refresh_index())?;
    tokio_test::block_on(controller.annotate_title(
        "The Long Night",
        Some(temp_dir.path().join("first.txt")),
        false,
    ))?;
    tokio_test::block_on(controller.annotate_title(
        "The Long Night",
        Some(temp_dir.path().join("second.txt")),
        false,
    ))?;

    let counts = tracker.lock().unwrap();
    assert_eq!(counts.listing_calls, 1);
    assert_eq!(counts.detail_calls, 1, "detail page should be resolved once");
    assert_eq!(counts.script_calls, 1, "script should be fetched once and then cached");

    Ok(())
}

/// Test that a misspelled query still resolves through fuzzy matching
#[test]
fn test_annotationWorkflow_fuzzyQuery_shouldResolveTitle() -> Result<()> {
    common::init_test_logging();
    let (controller, _tracker) = controller_with_sample("The Long Night")?;
    let temp_dir = common::create_temp_dir()?;
    let out_path = temp_dir.path().join("fuzzy.txt");

    tokio_test::block_on(controller.refresh_index())?;
    tokio_test::block_on(controller.annotate_title("long nigt", Some(out_path.clone()), false))?;

    assert!(out_path.exists());
    Ok(())
}

/// Test that an unmatched query fails and names the nearest titles
#[test]
fn test_annotationWorkflow_unknownTitle_shouldListNearest() -> Result<()> {
    common::init_test_logging();
    let (controller, _tracker) = controller_with_sample("The Long Night")?;

    tokio_test::block_on(controller.refresh_index())?;
    let err = tokio_test::block_on(controller.annotate_title("completely different", None, false))
        .expect_err("an unmatched query must fail");

    let message = err.to_string();
    assert!(message.contains("No title matching"), "unexpected message: {}", message);
    assert!(message.contains("The Long Night"), "nearest titles missing: {}", message);

    Ok(())
}

/// Test that a title listed without a script page fails cleanly
#[test]
fn test_annotationWorkflow_unavailableScript_shouldFail() -> Result<()> {
    common::init_test_logging();
    let mut source = MockScriptSource::new();
    source.add_unavailable("Ghost");
    let controller = Controller::with_components(
        Config::default(),
        Arc::new(source),
        Catalog::new_in_memory()?,
    );

    tokio_test::block_on(controller.refresh_index())?;
    let err = tokio_test::block_on(controller.annotate_title("Ghost", None, false))
        .expect_err("a script-less title must fail");

    assert!(err.to_string().contains("No script available for 'Ghost'"));
    Ok(())
}

/// Test that JSON output writes a parseable entry array
#[test]
fn test_annotationWorkflow_jsonFormat_shouldWriteEntryArray() -> Result<()> {
    common::init_test_logging();
    let source = MockScriptSource::with_sample("The Long Night");
    let mut config = Config::default();
    config.render.format = RenderFormat::Json;
    let controller =
        Controller::with_components(config, Arc::new(source), Catalog::new_in_memory()?);

    let temp_dir = common::create_temp_dir()?;
    let out_path = temp_dir.path().join("night.json");

    tokio_test::block_on(controller.refresh_index())?;
    tokio_test::block_on(controller.annotate_title("The Long Night", Some(out_path.clone()), false))?;

    let entries: Vec<Entry> = serde_json::from_str(&fs::read_to_string(&out_path)?)?;
    assert_eq!(entries.len(), 28);

    Ok(())
}

/// Test annotating a local markup file into the same directory
#[test]
fn test_annotateFile_withMarkupInput_shouldWriteAnnotatedCopy() -> Result<()> {
    common::init_test_logging();
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_script(&dir, "diner.html")?;

    tokio_test::block_on(controller.annotate_file(input.clone(), dir.clone(), false))?;

    let output = dir.join("diner.annotated.txt");
    assert!(output.exists());
    assert_eq!(fs::read_to_string(&output)?.lines().count(), 28);

    // A second run without force skips quietly; with force it rewrites
    tokio_test::block_on(controller.annotate_file(input.clone(), dir.clone(), false))?;
    tokio_test::block_on(controller.annotate_file(input, dir, true))?;

    Ok(())
}

/// Test that annotating an empty page reports the annotation failure
#[test]
fn test_annotateFile_withEmptyMarkup_shouldFail() -> Result<()> {
    common::init_test_logging();
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "hollow.html", "<pre>\n   \n</pre>\n")?;

    let err = tokio_test::block_on(controller.annotate_file(input, dir, false))
        .expect_err("an entry-less page must fail");
    assert!(err.to_string().contains("Failed to annotate"));

    Ok(())
}

/// Test annotating a whole folder of scripts
#[test]
fn test_annotateFolder_shouldProcessAllScriptsAndLogSummary() -> Result<()> {
    common::init_test_logging();
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_script(&dir, "diner.html")?;
    common::create_test_script(&dir, "alley.htm")?;
    common::create_test_file(&dir, "notes.log", "not a script")?;

    tokio_test::block_on(controller.annotate_folder(dir.clone(), false))?;

    assert!(dir.join("diner.annotated.txt").exists());
    assert!(dir.join("alley.annotated.txt").exists());
    assert!(!dir.join("notes.annotated.txt").exists());
    assert!(dir.join("screenmark.issues.log").exists());

    Ok(())
}

/// Test that a second folder run leaves earlier outputs alone
#[test]
fn test_annotateFolder_secondRun_shouldSkipExistingAnnotations() -> Result<()> {
    common::init_test_logging();
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_script(&dir, "diner.html")?;

    tokio_test::block_on(controller.annotate_folder(dir.clone(), false))?;
    tokio_test::block_on(controller.annotate_folder(dir.clone(), false))?;

    // The output from the first run is never re-annotated
    let names: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert!(names.iter().any(|n| n == "diner.annotated.txt"));
    assert!(!names.iter().any(|n| n.contains(".annotated.annotated")), "outputs were re-annotated: {:?}", names);

    Ok(())
}

/// Test that an empty folder is an error, not a silent no-op
#[test]
fn test_annotateFolder_withoutScripts_shouldFail() -> Result<()> {
    common::init_test_logging();
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;

    let err = tokio_test::block_on(controller.annotate_folder(temp_dir.path().to_path_buf(), false))
        .expect_err("an empty folder must fail");
    assert!(err.to_string().contains("No script files found"));

    Ok(())
}
