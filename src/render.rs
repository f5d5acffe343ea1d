/*!
 * Output rendering for annotated scripts.
 *
 * Two formats are supported: plain text with a kind gutter in front of
 * each line, and a JSON array of entries. Text output can optionally
 * colorize the gutter with ANSI escapes for terminal display.
 */

use anyhow::{Context, Result};
use std::path::Path;

use crate::annotation::{AnnotatedScript, AnnotationKind, Entry};
use crate::app_config::{RenderConfig, RenderFormat};

/// Width of the kind gutter; fits the longest label
const GUTTER_WIDTH: usize = 10;

/// ANSI reset sequence
const ANSI_RESET: &str = "\x1B[0m";

/// Renders annotated scripts into their output representation
#[derive(Debug, Clone, Default)]
pub struct ScriptRenderer {
    /// Rendering configuration
    config: RenderConfig,
}

impl ScriptRenderer {
    /// Create a renderer with the given configuration
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Create a plain-text renderer without color
    pub fn with_format(format: RenderFormat) -> Self {
        Self {
            config: RenderConfig {
                format,
                color: false,
            },
        }
    }

    /// The configured output format
    pub fn format(&self) -> &RenderFormat {
        &self.config.format
    }

    /// Render a script to a string in the configured format
    pub fn render(&self, script: &AnnotatedScript) -> Result<String> {
        match self.config.format {
            RenderFormat::Text => Ok(self.render_text(script.entries())),
            RenderFormat::Json => Self::render_json(script.entries()),
        }
    }

    /// Render a script and write it to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(&self, script: &AnnotatedScript, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Never embed ANSI escapes in files
        let plain = Self {
            config: RenderConfig {
                format: self.config.format.clone(),
                color: false,
            },
        };
        let output = plain.render(script)?;

        std::fs::write(path, output)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;

        Ok(())
    }

    /// Plain text output: one line per entry with the kind in a gutter
    fn render_text(&self, entries: &[Entry]) -> String {
        let mut output = String::new();
        for entry in entries {
            let label = entry.annotation.label();
            if self.config.color {
                let code = Self::color_code(entry.annotation);
                if code.is_empty() {
                    output.push_str(&format!("{:<GUTTER_WIDTH$} | ", label));
                } else {
                    output.push_str(&format!("{}{:<GUTTER_WIDTH$}{} | ", code, label, ANSI_RESET));
                }
            } else {
                output.push_str(&format!("{:<GUTTER_WIDTH$} | ", label));
            }
            output.push_str(&entry.content);
            output.push('\n');
        }
        output
    }

    /// JSON output: pretty-printed array of entries
    fn render_json(entries: &[Entry]) -> Result<String> {
        serde_json::to_string_pretty(entries).context("Failed to serialize entries to JSON")
    }

    /// ANSI color for the gutter label; empty string means plain
    fn color_code(kind: AnnotationKind) -> &'static str {
        match kind {
            AnnotationKind::Scene => "\x1B[1;32m",
            AnnotationKind::Character => "\x1B[1;36m",
            AnnotationKind::SpeechCue => "\x1B[1;35m",
            AnnotationKind::Meta => "\x1B[1;33m",
            AnnotationKind::Unknown => "\x1B[1;31m",
            AnnotationKind::Speech | AnnotationKind::Narrative => "",
        }
    }
}
