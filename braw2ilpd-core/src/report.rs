//! The detailed attribute report.
//!
//! Renders the full attribute cache into a deterministic, ordered text
//! report (modulo the labeled generation timestamp) and persists it next to
//! the primary payload through the atomic writer.

use chrono::Local;
use std::path::{Path, PathBuf};

use crate::attributes::{AttributeSet, ATTRIBUTES};
use crate::error::CoreResult;
use crate::writer::write_atomic;

/// Suffix replacing the primary file's extension for the report path.
const REPORT_SUFFIX: &str = "_detailed_attributes.txt";

/// Derives the report path from the primary payload path: same directory,
/// primary base name plus the report suffix. Path style (absolute vs
/// relative) follows the primary path.
pub fn report_path_for(primary: &Path) -> PathBuf {
    match primary.file_stem() {
        Some(stem) => {
            let mut name = stem.to_os_string();
            name.push(REPORT_SUFFIX);
            primary.with_file_name(name)
        }
        None => {
            let mut raw = primary.as_os_str().to_os_string();
            raw.push(REPORT_SUFFIX);
            PathBuf::from(raw)
        }
    }
}

/// Renders the report text.
///
/// Entries follow the canonical attribute order; each carries its 1-based
/// index, name, decoded type, fixed description, and cached display string.
/// An identity missing from the set (which extraction never produces, but is
/// handled anyway) renders an explicit "Not retrieved" marker.
pub fn render(input_path: &Path, primary_path: &Path, attrs: &AttributeSet) -> String {
    let mut out = String::new();
    out.push_str("Complete Blackmagic RAW Immersive Video Attribute List (Detailed)\n");
    out.push_str(&"=".repeat(61));
    out.push_str("\n\n");
    out.push_str(&format!("Input file: {}\n", input_path.display()));
    out.push_str(&format!("ILPD file: {}\n", primary_path.display()));
    out.push_str(&format!(
        "Generated on: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for (index, attr) in ATTRIBUTES.iter().enumerate() {
        match attrs.get(attr.id) {
            Some(value) => {
                out.push_str(&format!(
                    "[{}] {} (type: {})\n",
                    index + 1,
                    attr.name,
                    value.kind_name()
                ));
                out.push_str(&format!("Description: {}\n", attr.description));
                out.push_str(&value.display());
                out.push('\n');
            }
            None => {
                out.push_str(&format!("[{}] {} (type: Not retrieved)\n", index + 1, attr.name));
                out.push_str(&format!("Description: {}\n", attr.description));
                out.push_str("Not retrieved\n");
            }
        }
        out.push('\n');
        out.push_str(&"-".repeat(40));
        out.push_str("\n\n");
    }

    out
}

/// Renders and persists the report, returning the path it was written to.
pub fn write_report(
    input_path: &Path,
    primary_path: &Path,
    attrs: &AttributeSet,
) -> CoreResult<PathBuf> {
    let report_path = report_path_for(primary_path);
    let content = render(input_path, primary_path, attrs);
    write_atomic(&report_path, &content)?;
    Ok(report_path)
}
