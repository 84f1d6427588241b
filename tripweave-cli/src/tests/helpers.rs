//! Test helpers for laying out catalog directories and requests.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const CITY_FILE: &str = r#"[
    {"id": 1, "name": "Torre de Belém", "latitude": 38.6916, "longitude": -9.2160, "rating": 4.6, "duration": 2700},
    {"id": 2, "name": "Mosteiro dos Jerónimos", "latitude": 38.6979, "longitude": -9.2068, "rating": 4.8},
    {"id": 3, "name": "Padrão dos Descobrimentos", "latitude": 38.6936, "longitude": -9.2056, "rating": 4.4, "duration": 1800}
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary catalog directory with Lisbon and the user `ana`.
pub(super) struct CatalogDir {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl CatalogDir {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("users.json"), br#"["ana"]"#);
        write_utf8(&root.join("Lisbon.json"), CITY_FILE.as_bytes());
        Self { _tmp: tmp, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn request_path(&self) -> Utf8PathBuf {
        self.root.join("request.json")
    }
}

/// A Monday walking request for every Lisbon place.
pub(super) fn request_json(uid: &str) -> String {
    format!(
        r#"{{
    "city": "Lisbon",
    "uid": "{uid}",
    "preferences": {{
        "timeFrame": [{{"day": 1, "open": "0900", "close": "1800"}}],
        "travelMode": "walking",
        "heuristicValue": 0.5
    }},
    "start": {{"name": "Hotel", "latitude": 38.6960, "longitude": -9.2100}},
    "places": [{{"id": 1}}, {{"id": 2, "duration": 3600}}, {{"id": 3}}]
}}"#
    )
}
