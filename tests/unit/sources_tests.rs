/*!
 * Tests for the script source trait plumbing
 *
 * The real IMSDb parsing is covered next to its implementation; these
 * exercise the trait surface through the mock the workflow tests rely on.
 */

use anyhow::Result;
use tokio_test;

use screenmark::app_config::SourceConfig;
use screenmark::errors::SourceError;
use screenmark::sources::{ImsdbSource, ScriptSource, TitleListing};
use crate::common::mock_sources::MockScriptSource;

/// Test that a registered title shows up in the listing
#[test]
fn test_mockSource_fetchListing_shouldReturnRegisteredTitles() -> Result<()> {
    let mut source = MockScriptSource::new();
    source.add_script("Alpha", "<pre>INT. A - DAY</pre>");
    source.add_script("Beta", "<pre>INT. B - DAY</pre>");

    let listings = tokio_test::block_on(source.fetch_listing())?;

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].title, "Alpha");
    assert!(listings[0].detail_path.contains("Alpha"));

    Ok(())
}

/// Test that resolving and fetching a script round-trips the markup
#[test]
fn test_mockSource_fetchScript_shouldReturnRegisteredMarkup() -> Result<()> {
    let mut source = MockScriptSource::new();
    source.add_script("Alpha", "<pre>INT. A - DAY</pre>");

    let listing = TitleListing::new("Alpha", "/Movie Scripts/Alpha Script.html");
    let detail = tokio_test::block_on(source.fetch_detail(&listing))?;
    assert_eq!(detail.title, "Alpha");

    let markup = tokio_test::block_on(source.fetch_script(&detail))?;
    assert_eq!(markup, "<pre>INT. A - DAY</pre>");

    Ok(())
}

/// Test that a title without a script page reports ScriptUnavailable
#[test]
fn test_mockSource_fetchDetail_missingScript_shouldBeUnavailable() {
    let mut source = MockScriptSource::new();
    source.add_unavailable("Ghost Title");

    let listing = TitleListing::new("Ghost Title", "/Movie Scripts/Ghost Title Script.html");
    let result = tokio_test::block_on(source.fetch_detail(&listing));

    assert!(matches!(result, Err(SourceError::ScriptUnavailable(_))));
}

/// Test that fail_next_call fails exactly once
#[test]
fn test_mockSource_failNextCall_shouldErrorOnceThenRecover() -> Result<()> {
    let mut source = MockScriptSource::new();
    source.add_script("Alpha", "<pre>INT. A - DAY</pre>");
    source.fail_next_call();

    let failed = tokio_test::block_on(source.fetch_listing());
    assert!(matches!(failed, Err(SourceError::ConnectionError(_))));

    let recovered = tokio_test::block_on(source.fetch_listing())?;
    assert_eq!(recovered.len(), 1);

    Ok(())
}

/// Test that the tracker counts every call by type
#[test]
fn test_mockSource_tracker_shouldCountCallsByType() -> Result<()> {
    let mut source = MockScriptSource::new();
    source.add_script("Alpha", "<pre>INT. A - DAY</pre>");
    let tracker = source.tracker();

    let listing = TitleListing::new("Alpha", "/Movie Scripts/Alpha Script.html");
    tokio_test::block_on(source.fetch_listing())?;
    let detail = tokio_test::block_on(source.fetch_detail(&listing))?;
    tokio_test::block_on(source.fetch_script(&detail))?;
    tokio_test::block_on(source.fetch_script(&detail))?;

    let counts = tracker.lock().unwrap();
    assert_eq!(counts.listing_calls, 1);
    assert_eq!(counts.detail_calls, 1);
    assert_eq!(counts.script_calls, 2);

    Ok(())
}

/// Test that the production source builds from a default config
#[test]
fn test_imsdbSource_withDefaultConfig_shouldConstruct() -> Result<()> {
    let source = ImsdbSource::with_config(&SourceConfig::default())?;
    assert_eq!(source.name(), "IMSDb");
    Ok(())
}
