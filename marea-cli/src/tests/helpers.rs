//! Temporary workspaces holding datasets and snapshots for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const SAMPLE_DATASET: &str = r#"[
    {"id": "170955", "name": "Lloret de Mar", "comarca": "Selva",
     "population": 39363, "hotelPlaces": 30000, "lat": 41.70, "lng": 2.845,
     "source": "official"},
    {"id": "250001", "name": "Vilanova de la Sal", "population": 200,
     "hotelPlaces": 0, "category": "interior", "lat": 41.85, "lng": 1.05},
    {"id": "259999", "name": "Poble Fantasma", "population": -5}
]"#;

pub(super) const SAMPLE_SIGNALS: &str = r#"{
    "250001": {"occupancyPercent": 80.0, "pressure": 0.2, "confidence": 0.9}
}"#;

/// Temporary directory with UTF-8 helpers.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}
