//! Output name synthesis and user-intent path resolution.
//!
//! The default file name is derived from clip attributes through a layered
//! fallback chain, so a usable name exists even for clips missing most
//! naming attributes. The user's output argument is then mapped onto a final
//! destination path, preserving whether the user asked for an absolute path.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::attributes::{AttributeId, AttributeSet};
use crate::error::{CoreError, CoreResult};
use crate::variant::AttributeValue;

/// Resolved destination for the primary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Final path for the ILPD payload file.
    pub path: PathBuf,
    /// Whether the user's own output argument was an absolute path. Derived
    /// artifacts (the detailed report) share this path style.
    pub user_absolute: bool,
}

/// Derives the canonical default file name `{camera}.{uuid}.ilpd` from the
/// extracted attributes.
///
/// Fallback chain, in order:
/// 1. camera and uuid from the ILPD file name attribute (stem split at its
///    last internal `.` separator),
/// 2. uuid from the lens processing UUID attribute,
/// 3. camera from the input clip's file stem,
/// 4. uuid from the literal `"default"`.
pub fn synthesize_name(input_hint: &Path, attrs: &AttributeSet) -> String {
    let mut camera: Option<String> = None;
    let mut uuid: Option<String> = None;

    if let Some(name) = non_empty_text(attrs.get(AttributeId::IlpdFileName)) {
        let stem = name.rsplit_once('.').map_or(name, |(stem, _ext)| stem);
        match stem.rsplit_once('.') {
            Some((cam, id)) => {
                camera = Some(cam.to_string());
                uuid = Some(id.to_string());
            }
            None => camera = Some(stem.to_string()),
        }
    }

    if uuid.is_none() {
        if let Some(u) = non_empty_text(attrs.get(AttributeId::LensProcessingDataFileUuid)) {
            uuid = Some(u.to_string());
        }
    }

    if camera.is_none() {
        camera = input_hint
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
    }

    let camera = camera.unwrap_or_else(|| "clip".to_string());
    let uuid = uuid.unwrap_or_else(|| "default".to_string());
    format!("{camera}.{uuid}.ilpd")
}

fn non_empty_text(value: Option<&AttributeValue>) -> Option<&str> {
    value.and_then(AttributeValue::as_text).filter(|s| !s.is_empty())
}

/// Maps the user's output argument onto a final destination path.
///
/// - empty or `.`: the auto name in the current directory,
/// - an existing directory: that directory joined with the auto name,
/// - an existing file: that exact path (overwritten),
/// - a non-existent path with a trailing separator or no extension: created
///   as a directory (with parents) and joined with the auto name,
/// - a non-existent path with an extension: taken verbatim as the target
///   file; missing parents are created, and a non-`.ilpd` extension gets a
///   non-fatal advisory.
///
/// Directory creation failure invalidates the plan for this artifact.
pub fn resolve_output(user_arg: &str, auto_name: &str) -> CoreResult<OutputPlan> {
    if user_arg.is_empty() || user_arg == "." {
        return Ok(OutputPlan {
            path: PathBuf::from(auto_name),
            user_absolute: false,
        });
    }

    let user_path = Path::new(user_arg);
    let user_absolute = user_path.is_absolute();

    if user_path.is_dir() {
        return Ok(OutputPlan {
            path: user_path.join(auto_name),
            user_absolute,
        });
    }

    if user_path.is_file() {
        // Existing files are overwritten by design.
        debug!("Output '{}' exists and will be overwritten", user_path.display());
        return Ok(OutputPlan {
            path: user_path.to_path_buf(),
            user_absolute,
        });
    }

    let trailing_separator =
        user_arg.ends_with('/') || user_arg.ends_with(std::path::MAIN_SEPARATOR);
    if trailing_separator || user_path.extension().is_none() {
        // Directory intent: create it (with parents) and place the auto name
        // inside.
        fs::create_dir_all(user_path).map_err(|e| {
            CoreError::OutputResolution(format!(
                "failed to create output directory '{}': {}",
                user_path.display(),
                e
            ))
        })?;
        return Ok(OutputPlan {
            path: user_path.join(auto_name),
            user_absolute,
        });
    }

    // Target file intent: the path is taken verbatim.
    if let Some(parent) = user_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::OutputResolution(format!(
                    "failed to create parent directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let is_ilpd = user_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ilpd"));
    if !is_ilpd {
        warn!(
            "Output file '{}' does not use the .ilpd extension",
            user_path.display()
        );
    }

    Ok(OutputPlan {
        path: user_path.to_path_buf(),
        user_absolute,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::extract_all;
    use crate::error::CoreResult;
    use crate::source::AttributeSource;
    use crate::variant::RawVariant;
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct MapSource {
        values: HashMap<AttributeId, RawVariant>,
    }

    impl AttributeSource for MapSource {
        fn query(&self, id: AttributeId) -> CoreResult<RawVariant> {
            self.values
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::AttributeQuery(format!("{id:?} not available")))
        }
    }

    fn attrs_with(values: Vec<(AttributeId, RawVariant)>) -> AttributeSet {
        extract_all(&MapSource {
            values: values.into_iter().collect(),
        })
    }

    #[test]
    fn test_name_from_ilpd_file_name() {
        let attrs = attrs_with(vec![(
            AttributeId::IlpdFileName,
            RawVariant::String("CAM1.ABCD1234.ilpd".to_string()),
        )]);
        assert_eq!(
            synthesize_name(Path::new("clip001.braw"), &attrs),
            "CAM1.ABCD1234.ilpd"
        );
    }

    #[test]
    fn test_name_uuid_from_lens_attribute() {
        // ILPD name has no internal separator, so the uuid comes from the
        // lens processing UUID attribute.
        let attrs = attrs_with(vec![
            (
                AttributeId::IlpdFileName,
                RawVariant::String("CAM1.ilpd".to_string()),
            ),
            (
                AttributeId::LensProcessingDataFileUuid,
                RawVariant::String("FEED5678".to_string()),
            ),
        ]);
        assert_eq!(
            synthesize_name(Path::new("clip001.braw"), &attrs),
            "CAM1.FEED5678.ilpd"
        );
    }

    #[test]
    fn test_name_falls_back_to_input_stem_and_default() {
        let attrs = attrs_with(Vec::new());
        assert_eq!(
            synthesize_name(Path::new("clip001.braw"), &attrs),
            "clip001.default.ilpd"
        );
    }

    #[test]
    fn test_name_camera_from_hint_uuid_from_attribute() {
        let attrs = attrs_with(vec![(
            AttributeId::LensProcessingDataFileUuid,
            RawVariant::String("FEED5678".to_string()),
        )]);
        assert_eq!(
            synthesize_name(Path::new("/media/clip001.braw"), &attrs),
            "clip001.FEED5678.ilpd"
        );
    }

    #[test]
    fn test_name_ignores_empty_attribute_text() {
        let attrs = attrs_with(vec![
            (AttributeId::IlpdFileName, RawVariant::String(String::new())),
            (
                AttributeId::LensProcessingDataFileUuid,
                RawVariant::String(String::new()),
            ),
        ]);
        assert_eq!(
            synthesize_name(Path::new("clip001.braw"), &attrs),
            "clip001.default.ilpd"
        );
    }

    #[test]
    fn test_resolve_empty_and_dot_are_relative() {
        let plan = resolve_output("", "a.b.ilpd").unwrap();
        assert_eq!(plan.path, PathBuf::from("a.b.ilpd"));
        assert!(!plan.user_absolute);

        let plan = resolve_output(".", "a.b.ilpd").unwrap();
        assert_eq!(plan.path, PathBuf::from("a.b.ilpd"));
        assert!(!plan.user_absolute);
    }

    #[test]
    fn test_resolve_existing_directory() {
        let dir = tempdir().unwrap();
        let arg = dir.path().to_string_lossy().into_owned();
        let plan = resolve_output(&arg, "a.b.ilpd").unwrap();
        assert_eq!(plan.path, dir.path().join("a.b.ilpd"));
        assert!(plan.user_absolute);
    }

    #[test]
    fn test_resolve_existing_file_taken_verbatim() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("existing.ilpd");
        fs::write(&file, "old").unwrap();

        let arg = file.to_string_lossy().into_owned();
        let plan = resolve_output(&arg, "a.b.ilpd").unwrap();
        assert_eq!(plan.path, file);
        assert!(plan.user_absolute);
    }

    #[test]
    fn test_resolve_creates_missing_directory_without_extension() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("new/nested/outdir");
        let arg = target.to_string_lossy().into_owned();

        let plan = resolve_output(&arg, "a.b.ilpd").unwrap();
        assert!(target.is_dir());
        assert_eq!(plan.path, target.join("a.b.ilpd"));
    }

    #[test]
    fn test_resolve_trailing_separator_means_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.v2");
        let arg = format!("{}/", target.to_string_lossy());

        let plan = resolve_output(&arg, "a.b.ilpd").unwrap();
        assert!(target.is_dir());
        assert_eq!(plan.path, target.join("a.b.ilpd"));
    }

    #[test]
    fn test_resolve_new_file_creates_parents() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("deep/path/out.ilpd");
        let arg = target.to_string_lossy().into_owned();

        let plan = resolve_output(&arg, "a.b.ilpd").unwrap();
        assert_eq!(plan.path, target);
        assert!(target.parent().unwrap().is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn test_resolve_relative_intent_preserved() {
        let plan = resolve_output("relative-target.ilpd", "a.b.ilpd").unwrap();
        assert_eq!(plan.path, PathBuf::from("relative-target.ilpd"));
        assert!(!plan.user_absolute);
    }

    #[test]
    fn test_resolve_directory_creation_failure_invalidates_plan() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        // A path below a regular file cannot be created.
        let target = blocker.join("subdir");
        let arg = target.to_string_lossy().into_owned();
        let result = resolve_output(&arg, "a.b.ilpd");
        assert!(matches!(result, Err(CoreError::OutputResolution(_))));
    }
}
