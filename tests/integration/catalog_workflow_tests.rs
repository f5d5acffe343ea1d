/*!
 * Integration tests for the catalog storage layer
 *
 * Covers index refresh semantics, case-insensitive title lookup, script
 * storage, and persistence of a file-backed catalog across connections.
 */

use std::sync::Arc;
use anyhow::Result;
use tokio_test;

use screenmark::app_config::Config;
use screenmark::app_controller::Controller;
use screenmark::sources::TitleListing;
use screenmark::storage::{Catalog, CatalogConnection};
use crate::common;
use crate::common::mock_sources::MockScriptSource;

fn sample_listings() -> Vec<TitleListing> {
    vec![
        TitleListing {
            title: "The Long Night".to_string(),
            detail_path: "/Movie Scripts/The Long Night Script.html".to_string(),
        },
        TitleListing {
            title: "Night Shift".to_string(),
            detail_path: "/Movie Scripts/Night Shift Script.html".to_string(),
        },
    ]
}

/// Test that refreshing twice upserts instead of duplicating titles
#[test]
fn test_catalogWorkflow_refreshTwice_shouldKeepSingleIndex() -> Result<()> {
    common::init_test_logging();
    let catalog = Catalog::new_in_memory()?;

    assert_eq!(catalog.replace_titles(&sample_listings())?, 2);
    let first_ids: Vec<i64> = catalog.all_titles()?.iter().map(|r| r.id).collect();

    assert_eq!(catalog.replace_titles(&sample_listings())?, 2);
    assert_eq!(catalog.title_count()?, 2);

    // Unchanged titles keep their row ids across a refresh
    let second_ids: Vec<i64> = catalog.all_titles()?.iter().map(|r| r.id).collect();
    assert_eq!(first_ids, second_ids);

    Ok(())
}

/// Test that title lookup ignores letter case
#[test]
fn test_catalogWorkflow_findTitle_shouldIgnoreCase() -> Result<()> {
    common::init_test_logging();
    let catalog = Catalog::new_in_memory()?;
    catalog.replace_titles(&sample_listings())?;

    assert!(catalog.find_title("The Long Night")?.is_some());
    assert!(catalog.find_title("the long night")?.is_some());
    assert!(catalog.find_title("THE LONG NIGHT")?.is_some());
    assert!(catalog.find_title("The Short Day")?.is_none());

    Ok(())
}

/// Test that a stored script round-trips with its content hash
#[test]
fn test_catalogWorkflow_storeScript_shouldRoundTripWithHash() -> Result<()> {
    common::init_test_logging();
    let catalog = Catalog::new_in_memory()?;
    catalog.replace_titles(&sample_listings())?;
    let record = catalog.find_title("The Long Night")?.unwrap();

    let raw_text = common::sample_script_markup();
    tokio_test::block_on(catalog.store_script(record.id, raw_text))?;

    let stored = tokio_test::block_on(catalog.load_script(record.id))?.unwrap();
    assert_eq!(stored.title_id, record.id);
    assert_eq!(stored.raw_text, raw_text);
    assert_eq!(stored.sha256, Catalog::hash_text(raw_text));

    // The other title has no script yet
    let other = catalog.find_title("Night Shift")?.unwrap();
    assert!(tokio_test::block_on(catalog.load_script(other.id))?.is_none());

    Ok(())
}

/// Test that an annotation run populates the catalog exactly once
#[test]
fn test_catalogWorkflow_annotateRun_shouldStoreScriptAndDetailPath() -> Result<()> {
    common::init_test_logging();
    let catalog = Catalog::new_in_memory()?;
    let source = MockScriptSource::with_sample("The Long Night");
    let controller = Controller::with_components(
        Config::default(),
        Arc::new(source),
        catalog.clone(),
    );

    tokio_test::block_on(controller.refresh_index())?;
    tokio_test::block_on(controller.annotate_title("The Long Night", None, false))?;

    let stats = catalog.stats()?;
    assert_eq!(stats.title_count, 1);
    assert_eq!(stats.script_count, 1);

    let record = catalog.find_title("The Long Night")?.unwrap();
    assert!(record.script_path.is_some(), "resolved script page should be remembered");

    // A later index refresh keeps the stored script
    tokio_test::block_on(controller.refresh_index())?;
    assert_eq!(catalog.stats()?.script_count, 1);

    Ok(())
}

/// Test that a file-backed catalog persists across connections
#[test]
fn test_catalogWorkflow_fileBacked_shouldPersistAcrossConnections() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("catalog.db");

    {
        let catalog = Catalog::new(CatalogConnection::new(&db_path)?);
        catalog.replace_titles(&sample_listings())?;
    }

    let reopened = Catalog::new(CatalogConnection::new(&db_path)?);
    assert_eq!(reopened.title_count()?, 2);

    let stats = reopened.stats()?;
    assert_eq!(stats.title_count, 2);
    assert!(stats.file_size_bytes > 0);

    Ok(())
}
