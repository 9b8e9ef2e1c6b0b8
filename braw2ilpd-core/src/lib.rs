//! Core library for extracting lens projection data (ILPD) from Blackmagic
//! RAW immersive-video clips.
//!
//! This crate decodes the clip's tagged-union attribute values into a
//! normalized cache, derives a stable output file name from the cached
//! attributes, and persists the ILPD payload plus an optional detailed
//! attribute report with atomic write-temp-then-rename semantics.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use braw2ilpd_core::{run_extraction, DumpToolSource, ExtractionOptions};
//! use braw2ilpd_core::external::DEFAULT_DUMP_TOOL;
//! use std::path::Path;
//!
//! let clip = Path::new("clip001.braw");
//! let source = DumpToolSource::open(DEFAULT_DUMP_TOOL, clip).unwrap();
//! let options = ExtractionOptions {
//!     output_arg: Some("out/".to_string()),
//!     write_report: true,
//! };
//! let summary = run_extraction(&source, clip, &options);
//! assert!(!summary.primary.is_failed());
//! ```

pub mod attributes;
pub mod error;
pub mod external;
pub mod naming;
pub mod processing;
pub mod report;
pub mod source;
pub mod variant;
pub mod writer;

// Re-exports for public API
pub use attributes::{extract_all, AttributeId, AttributeInfo, AttributeSet, ATTRIBUTES};
pub use error::{CoreError, CoreResult};
pub use external::DumpToolSource;
pub use naming::{resolve_output, synthesize_name, OutputPlan};
pub use processing::{run_extraction, ArtifactOutcome, ExtractionOptions, ExtractionSummary};
pub use report::report_path_for;
pub use source::AttributeSource;
pub use variant::{AttributeValue, ByteArrayValue, RawVariant};
pub use writer::write_atomic;
