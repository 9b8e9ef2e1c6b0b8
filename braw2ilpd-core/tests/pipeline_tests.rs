//! End-to-end pipeline tests with an in-memory attribute source.

use braw2ilpd_core::variant::tag;
use braw2ilpd_core::{
    run_extraction, ArtifactOutcome, AttributeId, AttributeSource, CoreError, CoreResult,
    ExtractionOptions, RawVariant,
};
use std::collections::HashMap;
use std::path::Path;
use tempfile::tempdir;

struct MockSource {
    values: HashMap<AttributeId, RawVariant>,
}

impl MockSource {
    fn new(values: Vec<(AttributeId, RawVariant)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl AttributeSource for MockSource {
    fn query(&self, id: AttributeId) -> CoreResult<RawVariant> {
        self.values
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::AttributeQuery(format!("{id:?} not available")))
    }
}

fn full_source() -> MockSource {
    MockSource::new(vec![
        (
            AttributeId::LensProcessingDataFileUuid,
            RawVariant::String("ABCD1234".to_string()),
        ),
        (
            AttributeId::IlpdFileName,
            RawVariant::String("CAM1.ABCD1234.ilpd".to_string()),
        ),
        (AttributeId::Interaxial, RawVariant::Float32(64.0)),
        (
            AttributeId::ProjectionKind,
            RawVariant::String("fish".to_string()),
        ),
        (
            AttributeId::CalibrationType,
            RawVariant::String("meiRives".to_string()),
        ),
        (
            AttributeId::ProjectionData,
            RawVariant::String("ILPD-PAYLOAD-CONTENT".to_string()),
        ),
    ])
}

#[test]
fn test_pipeline_writes_primary_payload_verbatim() {
    let dir = tempdir().unwrap();
    let options = ExtractionOptions {
        output_arg: Some(dir.path().to_string_lossy().into_owned()),
        write_report: false,
    };

    let summary = run_extraction(&full_source(), Path::new("clip001.braw"), &options);

    assert_eq!(summary.attributes.len(), 6);
    match &summary.primary {
        ArtifactOutcome::Written(path) => {
            assert_eq!(path, &dir.path().join("CAM1.ABCD1234.ilpd"));
            assert_eq!(
                std::fs::read_to_string(path).unwrap(),
                "ILPD-PAYLOAD-CONTENT"
            );
        }
        other => panic!("expected primary to be written, got {other:?}"),
    }
    assert!(summary.report.is_none());

    // No temporary files linger after a successful run.
    let stray: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(stray.is_empty());
}

#[test]
fn test_pipeline_report_written_alongside_primary() {
    let dir = tempdir().unwrap();
    let options = ExtractionOptions {
        output_arg: Some(dir.path().to_string_lossy().into_owned()),
        write_report: true,
    };

    let summary = run_extraction(&full_source(), Path::new("clip001.braw"), &options);

    let report_path = match summary.report {
        Some(ArtifactOutcome::Written(path)) => path,
        other => panic!("expected report to be written, got {other:?}"),
    };
    assert_eq!(
        report_path,
        dir.path().join("CAM1.ABCD1234_detailed_attributes.txt")
    );

    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("[1] OpticalLensProcessingDataFileUUID (type: String)"));
    assert!(text.contains("[4] OpticalProjectionKind (type: String)"));
    assert!(text.contains("String value: fish"));
    assert!(text.contains("[6] OpticalProjectionData (type: String)"));
}

#[test]
fn test_pipeline_missing_payload_is_warning_and_idempotent() {
    let dir = tempdir().unwrap();
    let source = MockSource::new(vec![(
        AttributeId::ProjectionKind,
        RawVariant::String("fish".to_string()),
    )]);
    let options = ExtractionOptions {
        output_arg: Some(dir.path().to_string_lossy().into_owned()),
        write_report: false,
    };

    for _ in 0..2 {
        let summary = run_extraction(&source, Path::new("clip001.braw"), &options);
        match &summary.primary {
            ArtifactOutcome::Skipped(reason) => {
                assert!(reason.contains("projection data"));
            }
            other => panic!("expected primary to be skipped, got {other:?}"),
        }
    }

    // No primary file was produced on either run.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty());
}

#[test]
fn test_pipeline_report_proceeds_without_payload() {
    let dir = tempdir().unwrap();
    let source = MockSource::new(Vec::new());
    let options = ExtractionOptions {
        output_arg: Some(dir.path().to_string_lossy().into_owned()),
        write_report: true,
    };

    let summary = run_extraction(&source, Path::new("clip001.braw"), &options);

    assert!(matches!(summary.primary, ArtifactOutcome::Skipped(_)));
    let report_path = match summary.report {
        Some(ArtifactOutcome::Written(path)) => path,
        other => panic!("expected report to be written, got {other:?}"),
    };

    // All six attributes failed their queries; the report still lists each.
    let text = std::fs::read_to_string(&report_path).unwrap();
    for index in 1..=6 {
        assert!(text.contains(&format!("[{index}] ")));
    }
    assert!(text.contains("Failed to retrieve"));
    // Report name derives from the synthesized primary name.
    assert_eq!(
        report_path,
        dir.path().join("clip001.default_detailed_attributes.txt")
    );
}

#[test]
fn test_pipeline_byte_array_payload_rendered_in_report() {
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..600u32).map(|i| (i % 256) as u8).collect();
    let source = MockSource::new(vec![(
        AttributeId::ProjectionData,
        RawVariant::SafeArray {
            variant_type: tag::U8,
            element_count: 600,
            data,
        },
    )]);
    let options = ExtractionOptions {
        output_arg: Some(dir.path().to_string_lossy().into_owned()),
        write_report: true,
    };

    let summary = run_extraction(&source, Path::new("clip001.braw"), &options);

    // A byte-array projection payload is not text, so no primary is written.
    assert!(matches!(summary.primary, ArtifactOutcome::Skipped(_)));

    let report_path = match summary.report {
        Some(ArtifactOutcome::Written(path)) => path,
        other => panic!("expected report to be written, got {other:?}"),
    };
    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("SafeArray(count=600, type=1, size=600 bytes)"));
    assert!(text.contains("... (truncated)"));
}

#[test]
fn test_pipeline_unresolvable_output_fails_primary_only() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let options = ExtractionOptions {
        output_arg: Some(blocker.join("nested").to_string_lossy().into_owned()),
        write_report: true,
    };
    let summary = run_extraction(&full_source(), Path::new("clip001.braw"), &options);

    assert!(summary.primary.is_failed());
    assert!(matches!(summary.report, Some(ArtifactOutcome::Skipped(_))));
}
