use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::annotation::{self, AnnotatedScript};
use crate::app_config::Config;
use crate::errors::SearchError;
use crate::file_utils::{self, FileManager, FileType, SCRIPT_EXTENSIONS};
use crate::render::ScriptRenderer;
use crate::search::TitleMatcher;
use crate::sources::{ImsdbSource, ScriptSource, TitleDetail, TitleListing};
use crate::storage::{Catalog, CatalogConnection, TitleRecord};
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

// @module: Application controller for script annotation

/// Tag inserted into output filenames, as in `heat.annotated.txt`
const OUTPUT_TAG: &str = "annotated";

/// Main application controller for screenplay annotation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Remote script source
    source: Arc<dyn ScriptSource>,
    // @field: Local title and script catalog
    catalog: Catalog,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    /// and an in-memory catalog
    pub fn new_for_test() -> Result<Self> {
        let config = Config::default();
        let source = Arc::new(ImsdbSource::with_config(&config.source)?);
        let catalog = Catalog::new_in_memory()?;
        Ok(Self::with_components(config, source, catalog))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let source = Arc::new(ImsdbSource::with_config(&config.source)?);

        let catalog = match &config.catalog.database_path {
            Some(path) => Catalog::new(CatalogConnection::new(path)?),
            None => Catalog::new_default()?,
        };

        Ok(Self::with_components(config, source, catalog))
    }

    /// Create a controller from explicit components; used by tests to
    /// substitute an in-memory catalog and a stub source
    pub fn with_components(config: Config, source: Arc<dyn ScriptSource>, catalog: Catalog) -> Self {
        Self {
            config,
            source,
            catalog,
        }
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source.endpoint.is_empty()
    }

    /// Fetch the title listing from the source and rebuild the local index
    pub async fn refresh_index(&self) -> Result<usize> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        info!("Refreshing title index from {}", self.source.name());

        let listings = self.source.fetch_listing().await?;
        if listings.is_empty() {
            return Err(anyhow::anyhow!(
                "Source {} returned an empty title listing",
                self.source.name()
            ));
        }

        let count = self.catalog.replace_titles(&listings)?;

        info!(
            "Indexed {} title(s) in {}",
            count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(count)
    }

    /// Search the index and print every title at or above the match threshold
    pub fn search_titles(&self, query: &str) -> Result<()> {
        let titles = self.title_names()?;
        let matcher = TitleMatcher::new(self.config.search.threshold);
        let matches = matcher.matches(query, &titles);

        if matches.is_empty() {
            let nearest = self.nearest_titles(&matcher, query, &titles);
            return Err(SearchError::NoMatch {
                query: query.to_string(),
                nearest,
            }
            .into());
        }

        for (title, score) in &matches {
            println!("{:.2}  {}", score, title);
        }
        info!("{} match(es) for '{}'", matches.len(), query);

        Ok(())
    }

    /// Print the indexed titles, optionally filtered by a substring
    pub fn list_titles(&self, filter: Option<&str>) -> Result<()> {
        let titles = self.catalog.all_titles()?;
        if titles.is_empty() {
            warn!("The catalog is empty; run the refresh command first");
            return Ok(());
        }

        let filter_lower = filter.map(str::to_lowercase);
        let mut shown = 0usize;
        for record in &titles {
            if let Some(f) = &filter_lower {
                if !record.title.to_lowercase().contains(f.as_str()) {
                    continue;
                }
            }
            println!("{}", record.title);
            shown += 1;
        }

        let stats = self.catalog.stats()?;
        info!("{} of {} title(s) shown; catalog: {}", shown, titles.len(), stats);

        Ok(())
    }

    /// Annotate a titled script from the source, writing the result to the
    /// given path or to stdout when no path is given
    pub async fn annotate_title(
        &self,
        query: &str,
        output: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        let record = self.resolve_title(query)?;
        info!("Annotating: {}", record.title);

        let raw = self.fetch_or_load_script(&record).await?;
        let script = annotation::annotate(&raw)
            .with_context(|| format!("Failed to annotate script for '{}'", record.title))?;
        self.report_diagnostics(&script);

        match output {
            Some(path) => {
                if path.exists() && !force_overwrite {
                    warn!("Skipping, output already exists (use -f to force overwrite)");
                    return Ok(());
                }
                let renderer = ScriptRenderer::with_format(self.config.render.format.clone());
                renderer.write_to_file(&script, &path)?;
                info!(
                    "Success: {} ({})",
                    path.display(),
                    Self::format_duration(start_time.elapsed())
                );
            }
            None => {
                let renderer = ScriptRenderer::new(self.config.render.clone());
                let rendered = renderer.render(&script)?;
                print!("{}", rendered);
                if !rendered.ends_with('\n') {
                    println!();
                }
            }
        }

        Ok(())
    }

    /// Annotate a local script file into the output directory
    pub async fn annotate_file(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input file exists
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Check if the annotation already exists
        let output_path = self.annotated_output_path(&input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            // Skip if annotation already exists and no force flag
            warn!("Skipping file, annotation already exists (use -f to force overwrite)");
            return Ok(());
        }

        // Detect file type
        let file_type = FileManager::detect_file_type(&input_file)?;
        if file_type == FileType::Unknown {
            return Err(anyhow::anyhow!(
                "Unrecognized input file (expected script markup or text): {:?}",
                input_file
            ));
        }
        debug!("Detected {:?} input: {:?}", file_type, input_file);

        let raw = FileManager::read_to_string(&input_file)?;
        let script = annotation::annotate(&raw)
            .with_context(|| format!("Failed to annotate: {:?}", input_file))?;
        self.report_diagnostics(&script);

        // Files always get plain output, never ANSI escapes
        let renderer = ScriptRenderer::with_format(self.config.render.format.clone());
        let rendered = renderer.render(&script)?;
        FileManager::write_atomic(&output_path, &rendered)?;

        info!(
            "Success: {} ({})",
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Annotate every script file in a directory tree
    /// Files that already have annotations will be skipped
    pub async fn annotate_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input directory exists
        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Find all script files in the directory (recursive)
        let mut script_files = Vec::new();
        for ext in &SCRIPT_EXTENSIONS {
            let mut files = file_utils::FileManager::find_files(&input_dir, ext)?;
            script_files.append(&mut files);
        }

        // Leave outputs from earlier runs alone
        script_files.retain(|path| {
            !path
                .file_stem()
                .map(|stem| stem.to_string_lossy().ends_with(".annotated"))
                .unwrap_or(false)
        });

        // If no script files found, return error
        if script_files.is_empty() {
            return Err(anyhow::anyhow!(
                "No script files found in directory: {:?}",
                input_dir
            ));
        }
        script_files.sort();

        // Create multi-progress instance for multiple file processing
        let multi_progress = MultiProgress::new();

        // Create a progress bar for folder processing
        let folder_pb = multi_progress.add(ProgressBar::new(script_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Annotating files");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        // Process each script file
        for script_file in script_files.iter() {
            // Get the file name for display
            let file_name = script_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            // Update the folder progress bar to show current file
            folder_pb.set_message(format!("Annotating: {}", file_name));

            // Get output directory (use the file's own directory)
            let output_dir = match script_file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            // Check if annotation already exists
            let output_path = self.annotated_output_path(script_file, &output_dir);
            if output_path.exists() && !force_overwrite {
                // Skip if annotation already exists and no force flag
                warn!("Skipping file, annotation already exists (use -f to force overwrite)");
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            // Run the annotation for this file
            match self
                .annotate_file(script_file.clone(), output_dir, force_overwrite)
                .await
            {
                Ok(_) => {
                    success_count += 1;
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            // Update the folder progress bar
            folder_pb.inc(1);
        }

        // Finish the folder progress bar
        folder_pb.finish_with_message("Folder annotation complete");

        // Calculate and display the total elapsed time
        let duration = start_time.elapsed();

        // Give summary results - important for batch operations
        let summary_message = format!(
            "Folder annotation completed: {} processed, {} skipped, {} errors",
            success_count, skip_count, error_count
        );
        info!("{}", summary_message);

        // Write summary to log file
        let log_file_path = input_dir.join("screenmark.issues.log");
        if let Err(e) = FileManager::append_to_log_file(
            &log_file_path,
            &format!("{} - Duration: {}", summary_message, Self::format_duration(duration)),
        ) {
            warn!("Failed to write folder log to file: {}", e);
        }

        Ok(())
    }

    /// Resolve a query to one catalog row, exact match first, fuzzy second
    fn resolve_title(&self, query: &str) -> Result<TitleRecord> {
        if let Some(record) = self.catalog.find_title(query)? {
            return Ok(record);
        }

        let titles = self.title_names()?;
        let matcher = TitleMatcher::new(self.config.search.threshold);

        match matcher.best_match(query, &titles) {
            Some((title, score)) => {
                debug!("Resolved '{}' to '{}' (score {:.2})", query, title, score);
                self.catalog.find_title(title)?.ok_or_else(|| {
                    anyhow::anyhow!("Catalog row disappeared for title: {}", title)
                })
            }
            None => {
                let nearest = self.nearest_titles(&matcher, query, &titles);
                Err(SearchError::NoMatch {
                    query: query.to_string(),
                    nearest,
                }
                .into())
            }
        }
    }

    /// Load the stored script text, fetching and storing it on a miss
    async fn fetch_or_load_script(&self, record: &TitleRecord) -> Result<String> {
        if let Some(stored) = self.catalog.load_script(record.id).await? {
            debug!(
                "Using stored script for '{}' (sha {})",
                record.title,
                &stored.sha256[..8]
            );
            return Ok(stored.raw_text);
        }

        // Resolve the script page if the index row hasn't been resolved yet
        let detail = match &record.script_path {
            Some(path) => TitleDetail {
                title: record.title.clone(),
                script_path: path.clone(),
            },
            None => {
                let listing = TitleListing::new(record.title.clone(), record.detail_path.clone());
                let detail = self.source.fetch_detail(&listing).await?;
                self.catalog.set_script_path(record.id, &detail.script_path)?;
                detail
            }
        };

        let raw = self.source.fetch_script(&detail).await?;
        self.catalog.store_script(record.id, &raw).await?;

        Ok(raw)
    }

    /// Log the diagnostics summary; full detail only at debug level
    fn report_diagnostics(&self, script: &AnnotatedScript) {
        let report = script.diagnostics();
        if report.is_clean() {
            debug!("No diagnostics raised");
            return;
        }

        info!("{}", report.summary());
        if log::max_level() >= log::LevelFilter::Debug {
            debug!("{}", report);
        }
    }

    /// All indexed title names; errors when the index is empty
    fn title_names(&self) -> Result<Vec<String>> {
        let titles = self.catalog.all_titles()?;
        if titles.is_empty() {
            return Err(SearchError::EmptyIndex.into());
        }
        Ok(titles.into_iter().map(|record| record.title).collect())
    }

    /// The closest titles to a failed query, for the error message
    fn nearest_titles(&self, matcher: &TitleMatcher, query: &str, titles: &[String]) -> Vec<String> {
        matcher
            .rank(query, titles)
            .into_iter()
            .take(self.config.search.suggestions)
            .map(|(title, _)| title.to_string())
            .collect()
    }

    /// Get the expected annotation output path for a script file
    fn annotated_output_path(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(
            input_file,
            output_dir,
            OUTPUT_TAG,
            self.config.render.format.extension(),
        )
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
