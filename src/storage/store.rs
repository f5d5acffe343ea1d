/*!
 * Catalog connection management and repository.
 *
 * The catalog is a SQLite database holding the title index and the raw
 * script texts fetched so far. Connection access is serialized behind a
 * mutex; async callers go through spawn_blocking so the runtime never
 * blocks on disk I/O.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;
use crate::sources::TitleListing;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "screenmark.db";

/// Default database directory name under the user's data directory
const DEFAULT_DB_DIRNAME: &str = "screenmark";

/// Catalog connection wrapper with thread-safe access
#[derive(Clone)]
pub struct CatalogConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<rusqlite::Connection>>,
}

impl CatalogConnection {
    /// Open the catalog at the default location
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_catalog_path()?;
        Self::new(&db_path)
    }

    /// Open the catalog at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create catalog directory: {:?}", parent))?;
        }

        info!("Opening catalog at: {:?}", db_path);

        let conn = rusqlite::Connection::open(&db_path)
            .with_context(|| format!("Failed to open catalog: {:?}", db_path))?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory catalog (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory catalog");

        let conn = rusqlite::Connection::open_in_memory()
            .context("Failed to create in-memory catalog")?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Default catalog location under the user's data directory
    pub fn default_catalog_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a catalog operation with the connection
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire catalog lock: {}", e))?;

        f(&conn)
    }

    /// Execute a catalog operation asynchronously using spawn_blocking
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to acquire catalog lock: {}", e))?;

            f(&conn)
        })
        .await
        .context("Catalog task panicked")?
    }

    /// Begin a transaction and execute operations within it
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T>,
    {
        let mut conn = self
            .connection
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire catalog lock: {}", e))?;

        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;

        Ok(result)
    }
}

/// One title row from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    /// Row id
    pub id: i64,
    /// Display title
    pub title: String,
    /// Site-relative detail page path
    pub detail_path: String,
    /// Site-relative script page path, once resolved
    pub script_path: Option<String>,
}

/// One stored script text
#[derive(Debug, Clone)]
pub struct ScriptRecord {
    /// Owning title row id
    pub title_id: i64,
    /// Raw markup as fetched
    pub raw_text: String,
    /// SHA256 of the raw text
    pub sha256: String,
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogStats {
    /// Number of indexed titles
    pub title_count: i64,
    /// Number of stored script texts
    pub script_count: i64,
    /// Database file size in bytes (0 for in-memory)
    pub file_size_bytes: u64,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} title(s), {} script(s), {} KB on disk",
            self.title_count,
            self.script_count,
            self.file_size_bytes / 1024
        )
    }
}

/// High-level catalog repository
#[derive(Clone)]
pub struct Catalog {
    /// Catalog connection
    db: CatalogConnection,
}

impl Catalog {
    /// Create a catalog over the given connection
    pub fn new(db: CatalogConnection) -> Self {
        Self { db }
    }

    /// Open the catalog at the default location
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(CatalogConnection::new_default()?))
    }

    /// Create a catalog over an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(CatalogConnection::new_in_memory()?))
    }

    /// Compute SHA256 hash of text
    pub fn hash_text(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Replace the title index with a freshly fetched listing. Existing
    /// rows keep their ids (and any stored script) when the title is
    /// unchanged; new titles are inserted.
    pub fn replace_titles(&self, listings: &[TitleListing]) -> Result<usize> {
        let count = listings.len();
        self.db.transaction(|tx| {
            for listing in listings {
                tx.execute(
                    r#"
                    INSERT INTO titles (title, detail_path, fetched_at)
                    VALUES (?1, ?2, datetime('now'))
                    ON CONFLICT(title) DO UPDATE SET
                        detail_path = excluded.detail_path,
                        fetched_at = excluded.fetched_at
                    "#,
                    params![listing.title, listing.detail_path],
                )?;
            }
            Ok(())
        })?;
        debug!("Indexed {} title(s)", count);
        Ok(count)
    }

    /// All indexed titles in alphabetical order
    pub fn all_titles(&self) -> Result<Vec<TitleRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, detail_path, script_path FROM titles ORDER BY title",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(TitleRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    detail_path: row.get(2)?,
                    script_path: row.get(3)?,
                })
            })?;

            let mut titles = Vec::new();
            for row in rows {
                titles.push(row?);
            }
            Ok(titles)
        })
    }

    /// Number of indexed titles
    pub fn title_count(&self) -> Result<i64> {
        self.db.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Look up one title exactly (case-insensitive)
    pub fn find_title(&self, title: &str) -> Result<Option<TitleRecord>> {
        self.db.execute(|conn| {
            let record = conn
                .query_row(
                    "SELECT id, title, detail_path, script_path FROM titles WHERE title = ?1 COLLATE NOCASE",
                    [title],
                    |row| {
                        Ok(TitleRecord {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            detail_path: row.get(2)?,
                            script_path: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(record)
        })
    }

    /// Record the resolved script page path for a title
    pub fn set_script_path(&self, title_id: i64, script_path: &str) -> Result<()> {
        self.db.execute(|conn| {
            conn.execute(
                "UPDATE titles SET script_path = ?1 WHERE id = ?2",
                params![script_path, title_id],
            )?;
            Ok(())
        })
    }

    /// Store a fetched script text for a title
    pub async fn store_script(&self, title_id: i64, raw_text: &str) -> Result<()> {
        let raw_text = raw_text.to_string();
        let sha256 = Self::hash_text(&raw_text);

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT OR REPLACE INTO scripts (title_id, raw_text, sha256, fetched_at)
                    VALUES (?1, ?2, ?3, datetime('now'))
                    "#,
                    params![title_id, raw_text, sha256],
                )?;
                Ok(())
            })
            .await
    }

    /// Load a stored script text, if any
    pub async fn load_script(&self, title_id: i64) -> Result<Option<ScriptRecord>> {
        self.db
            .execute_async(move |conn| {
                let record = conn
                    .query_row(
                        "SELECT title_id, raw_text, sha256 FROM scripts WHERE title_id = ?1",
                        [title_id],
                        |row| {
                            Ok(ScriptRecord {
                                title_id: row.get(0)?,
                                raw_text: row.get(1)?,
                                sha256: row.get(2)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(record)
            })
            .await
    }

    /// Catalog statistics
    pub fn stats(&self) -> Result<CatalogStats> {
        let path = self.db.path().to_path_buf();
        self.db.execute(move |conn| {
            let title_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))
                .unwrap_or(0);
            let script_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM scripts", [], |row| row.get(0))
                .unwrap_or(0);

            let file_size_bytes = if path.to_string_lossy() != ":memory:" {
                std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0)
            } else {
                0
            };

            Ok(CatalogStats {
                title_count,
                script_count,
                file_size_bytes,
            })
        })
    }
}
