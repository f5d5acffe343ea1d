// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, RenderFormat};
use app_controller::Controller;

mod annotation;
mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod render;
mod search;
mod sources;
mod storage;

/// CLI Wrapper for RenderFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliRenderFormat {
    Text,
    Json,
}

impl From<CliRenderFormat> for RenderFormat {
    fn from(cli_format: CliRenderFormat) -> Self {
        match cli_format {
            CliRenderFormat::Text => RenderFormat::Text,
            CliRenderFormat::Json => RenderFormat::Json,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate a screenplay by title or local path (default command)
    #[command(alias = "mark")]
    Annotate(AnnotateArgs),

    /// Search the title index for matching titles
    Search(SearchArgs),

    /// List indexed titles
    List(ListArgs),

    /// Rebuild the title index from the source
    Refresh(RefreshArgs),

    /// Generate shell completions for screenmark
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AnnotateArgs {
    /// Title to annotate, or a local script file or directory
    #[arg(value_name = "TITLE_OR_PATH")]
    target: String,

    /// Output file (for a title) or output directory (for a local file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliRenderFormat>,

    /// Colorize terminal output with ANSI escapes
    #[arg(long)]
    color: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// Title query to search for
    #[arg(value_name = "QUERY")]
    query: String,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Only show titles containing this substring
    #[arg(value_name = "FILTER")]
    filter: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct RefreshArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// screenmark - screenplay structure annotation
///
/// Fetches screenplay texts from a script archive and labels every line
/// with its structural role: scene headings, character cues, dialogue,
/// delivery notes, narration and production meta.
#[derive(Parser, Debug)]
#[command(name = "screenmark")]
#[command(author = "screenmark team")]
#[command(version = "0.9.0")]
#[command(about = "Screenplay structure annotation tool")]
#[command(long_about = "screenmark downloads screenplay texts and annotates every line with its structural role.

EXAMPLES:
    screenmark \"The Matrix\"                    # Annotate a title to stdout
    screenmark annotate Alien -o alien.txt      # Write the annotation to a file
    screenmark scripts/heat.html                # Annotate a local markup file
    screenmark scripts/                         # Annotate every script in a directory
    screenmark --format json \"Heat\"            # Emit the entry list as JSON
    screenmark search \"star wars\"              # Fuzzy-search the title index
    screenmark refresh                          # Rebuild the title index
    screenmark completions bash > screenmark.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

ANNOTATION KINDS:
    scene       Scene headings (INT./EXT. slug lines)
    character   Speaker cues above dialogue
    speech      Dialogue lines
    speech_cue  Parenthetical delivery notes
    narrative   Action and description
    meta        Transitions, production notes, front matter
    unknown     Lines no pass could claim")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Title to annotate, or a local script file or directory
    #[arg(value_name = "TITLE_OR_PATH")]
    target: Option<String>,

    /// Output file (for a title) or output directory (for a local file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliRenderFormat>,

    /// Colorize terminal output with ANSI escapes
    #[arg(long)]
    color: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = match record.level() {
                Level::Error => {
                    writeln!(
                        stderr,
                        "\x1B[1;31m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Warn => {
                    writeln!(
                        stderr,
                        "\x1B[1;33m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Info => {
                    writeln!(
                        stderr,
                        "\x1B[1;32m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Debug => {
                    writeln!(
                        stderr,
                        "\x1B[1;36m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Trace => {
                    writeln!(
                        stderr,
                        "\x1B[1;35m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "screenmark", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Annotate(args)) => run_annotate(args).await,
        Some(Commands::Search(args)) => run_search(args).await,
        Some(Commands::List(args)) => run_list(args).await,
        Some(Commands::Refresh(args)) => run_refresh(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let target = cli.target.ok_or_else(|| {
                anyhow!("TITLE_OR_PATH is required when no subcommand is specified")
            })?;

            let annotate_args = AnnotateArgs {
                target,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                format: cli.format,
                color: cli.color,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_annotate(annotate_args).await
        }
    }
}

/// Map a config log level to the log crate's filter
fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the configuration file (creating a default one when absent),
/// apply the command-line log level, and validate
fn prepare_config(config_path: &str, cli_log_level: &Option<CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = cli_log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Update log level in config if specified via command line
    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli_log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}

async fn run_annotate(options: AnnotateArgs) -> Result<()> {
    let mut config = prepare_config(&options.config_path, &options.log_level)?;

    // Override config with CLI options if provided
    if let Some(format) = &options.format {
        config.render.format = format.clone().into();
    }

    if options.color {
        config.render.color = true;
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // A target naming an existing path is annotated locally; anything
    // else is treated as a title to resolve against the index
    let target_path = Path::new(&options.target);
    if target_path.is_file() {
        let output_dir = match &options.output {
            Some(dir) => dir.clone(),
            None => target_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };
        controller
            .annotate_file(target_path.to_path_buf(), output_dir, options.force_overwrite)
            .await
    } else if target_path.is_dir() {
        if options.output.is_some() {
            warn!("--output is ignored in folder mode; annotations land next to their scripts");
        }
        controller
            .annotate_folder(target_path.to_path_buf(), options.force_overwrite)
            .await
    } else {
        controller
            .annotate_title(&options.target, options.output.clone(), options.force_overwrite)
            .await
    }
}

async fn run_search(options: SearchArgs) -> Result<()> {
    let config = prepare_config(&options.config_path, &options.log_level)?;
    let controller = Controller::with_config(config)?;
    controller.search_titles(&options.query)
}

async fn run_list(options: ListArgs) -> Result<()> {
    let config = prepare_config(&options.config_path, &options.log_level)?;
    let controller = Controller::with_config(config)?;
    controller.list_titles(options.filter.as_deref())
}

async fn run_refresh(options: RefreshArgs) -> Result<()> {
    let config = prepare_config(&options.config_path, &options.log_level)?;
    let controller = Controller::with_config(config)?;
    controller.refresh_index().await?;
    Ok(())
}
