//! The extraction pipeline: cache, name, resolve, persist.
//!
//! One clip is processed at a time. The attribute cache is populated once,
//! the output plan is computed from the cache and the user's output argument,
//! and the primary payload plus the optional detailed report are written
//! through the atomic writer. The two artifacts are independent: one may be
//! written while the other fails, and each outcome is reported distinctly.

use log::{info, warn};
use std::path::Path;

use crate::attributes::{extract_all, AttributeId, AttributeSet};
use crate::error::CoreError;
use crate::naming::{resolve_output, synthesize_name};
use crate::report;
use crate::source::AttributeSource;
use crate::variant::AttributeValue;
use crate::writer::write_atomic;

/// Caller intent for one extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOptions {
    /// The user's output argument, if any. Empty or absent means the derived
    /// name in the current directory.
    pub output_arg: Option<String>,
    /// Whether to also write the detailed attribute report.
    pub write_report: bool,
}

/// Per-artifact result of a run.
#[derive(Debug)]
pub enum ArtifactOutcome {
    /// The artifact was written to this path.
    Written(std::path::PathBuf),
    /// The artifact was deliberately not produced; the reason is a warning,
    /// not an error.
    Skipped(String),
    /// Producing the artifact failed; the destination was left untouched.
    Failed(CoreError),
}

impl ArtifactOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ArtifactOutcome::Failed(_))
    }
}

/// Everything one extraction run produced.
#[derive(Debug)]
pub struct ExtractionSummary {
    /// The fully populated attribute cache, one entry per identity.
    pub attributes: AttributeSet,
    /// Outcome for the primary ILPD payload file.
    pub primary: ArtifactOutcome,
    /// Outcome for the detailed report, when requested.
    pub report: Option<ArtifactOutcome>,
}

/// Runs the full extraction pipeline for one clip.
///
/// A missing or empty projection-data payload skips the primary file with a
/// warning; the report (when requested) still proceeds and is named after
/// the resolved primary path either way.
pub fn run_extraction(
    source: &dyn AttributeSource,
    input_path: &Path,
    options: &ExtractionOptions,
) -> ExtractionSummary {
    let attributes = extract_all(source);

    let auto_name = synthesize_name(input_path, &attributes);
    let user_arg = options.output_arg.as_deref().unwrap_or("");
    let plan = match resolve_output(user_arg, &auto_name) {
        Ok(plan) => plan,
        Err(e) => {
            // Without a destination neither artifact can be written.
            let report = options
                .write_report
                .then(|| ArtifactOutcome::Skipped("no resolved output path".to_string()));
            return ExtractionSummary {
                attributes,
                primary: ArtifactOutcome::Failed(e),
                report,
            };
        }
    };

    let payload = attributes
        .get(AttributeId::ProjectionData)
        .and_then(AttributeValue::as_text)
        .filter(|content| !content.is_empty());

    let primary = match payload {
        Some(content) => match write_atomic(&plan.path, content) {
            Ok(()) => {
                info!("ILPD projection data saved to: {}", plan.path.display());
                ArtifactOutcome::Written(plan.path.clone())
            }
            Err(e) => ArtifactOutcome::Failed(e),
        },
        None => {
            warn!("No OpticalProjectionData found, ILPD file not created");
            ArtifactOutcome::Skipped(
                "clip carries no projection data payload".to_string(),
            )
        }
    };

    let report = options.write_report.then(|| {
        match report::write_report(input_path, &plan.path, &attributes) {
            Ok(path) => {
                info!("Detailed attributes saved to: {}", path.display());
                ArtifactOutcome::Written(path)
            }
            Err(e) => ArtifactOutcome::Failed(e),
        }
    });

    ExtractionSummary {
        attributes,
        primary,
        report,
    }
}
