//! Loading datasets and signal snapshots from disk.

use camino::Utf8PathBuf;
use marea_core::{DataSource, MunicipalityId, SignalError, SignalProvider};
use marea_data::{DatasetError, ReferenceDataset, SignalSnapshot, SignalSnapshotError};
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Temporary directory and its UTF-8 path.
#[fixture]
pub fn workspace() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    (dir, root)
}

#[rstest]
fn loads_layered_dataset(workspace: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = workspace;
    let path = root.join("municipalities.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "250001", "name": "Vilanova de la Sal", "source": "heuristic"},
            {"id": "170955", "name": "Lloret de Mar", "population": 39363,
             "hotelPlaces": 30000, "lat": 41.70, "lng": 2.845, "source": "official"},
            {"id": "250001", "name": "Vilanova de la Sal", "population": 200,
             "source": "ai_enriched", "confidence": 0.6}
        ]"#,
    )
    .expect("write dataset");

    let dataset = ReferenceDataset::load(&path).expect("dataset loads");
    let ids: Vec<&str> = dataset.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["170955", "250001"]);
    let village = dataset.records().get(1).expect("village record");
    assert_eq!(village.data_source, DataSource::AiEnriched);
    assert_eq!(village.confidence, 0.6);
    assert_eq!(dataset.needs_enrichment(), 0);
}

#[rstest]
fn missing_dataset_reports_path(workspace: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = workspace;
    let path = root.join("absent.json");
    let err = ReferenceDataset::load(&path).expect_err("file is missing");
    assert!(matches!(err, DatasetError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[rstest]
fn invalid_json_is_a_parse_error(workspace: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = workspace;
    let path = root.join("broken.json");
    std::fs::write(&path, "[{").expect("write dataset");
    assert!(matches!(
        ReferenceDataset::load(&path),
        Err(DatasetError::Parse { .. })
    ));
}

#[rstest]
fn loads_signal_snapshot_with_malformed_entries(workspace: (TempDir, Utf8PathBuf)) {
    let (_guard, root) = workspace;
    let path = root.join("signals.json");
    std::fs::write(
        &path,
        r#"{
            "170955": {"occupancyPercent": 82.0, "pressure": 0.7, "confidence": 0.9},
            "081213": {"occupation_percentage": 40},
            "250001": {"occupancyPercent": "full"}
        }"#,
    )
    .expect("write snapshot");

    let snapshot = SignalSnapshot::load(&path).expect("snapshot loads");
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.malformed_count(), 1);
    let lloret = snapshot
        .signal_for(&MunicipalityId::from("170955"))
        .expect("lookup succeeds")
        .expect("signal present");
    assert_eq!(lloret.occupancy_percent, Some(82.0));
    assert!(matches!(
        snapshot.signal_for(&MunicipalityId::from("250001")),
        Err(SignalError::Malformed { .. })
    ));
}

#[rstest]
fn snapshot_must_be_an_object() {
    assert!(matches!(
        SignalSnapshot::from_json_str("[]"),
        Err(SignalSnapshotError::Shape { .. })
    ));
}
