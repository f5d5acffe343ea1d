/*!
 * Screenplay annotation engine.
 *
 * The heart of the tool: a multi-pass heuristic pipeline that assigns a
 * structural role to every line of a scraped screenplay. It is split
 * into several submodules:
 *
 * - `entry`: The entry model, annotation kinds and derived layout metrics
 * - `preprocess`: Markup normalization of raw page text
 * - `builder`: Logical entry construction with wrap merging
 * - `indentation`: Indentation clustering and structural seeding
 * - `lexicon`: Scene, cue and meta pattern sets, name cleanup rules
 * - `speech`: Dialogue propagation from cues
 * - `narrative`: Action-block inference from name mentions
 * - `cleanup`: Residue deletion and front-matter sealing
 * - `correct`: Duplicate character cue resolution
 * - `diagnostics`: Post-annotation quality report
 * - `pipeline`: Pass ordering and the public annotate entry point
 */

// Re-export main types for easier usage
pub use self::diagnostics::{DiagnosticsReport, SpeechAnomaly};
pub use self::entry::{AnnotationKind, Entry};
pub use self::pipeline::{AnnotatedScript, annotate};

// Submodules
pub mod builder;
pub mod cleanup;
pub mod correct;
pub mod diagnostics;
pub mod entry;
pub mod indentation;
pub mod lexicon;
pub mod narrative;
pub mod pipeline;
pub mod preprocess;
pub mod speech;
