// JSON file store
// Persists the face document to a single file on local disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{CubeData, FaceStore};
use crate::logger;

/// File-backed store for the face document
///
/// Reads are fresh from disk on every `load`; writes overwrite the file in
/// full. There is no write atomicity: a crash mid-write can leave a partial
/// file, which the next `load` reports as a parse error.
pub struct JsonFileStore {
    data_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
        }
    }
}

impl FaceStore for JsonFileStore {
    /// Load the document from disk.
    ///
    /// A missing file means no data has been saved yet and yields the
    /// default structure. Any other read or parse failure is returned to
    /// the caller instead of being papered over with defaults.
    fn load(&self) -> Result<CubeData, String> {
        match fs::read_to_string(&self.data_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                format!(
                    "Failed to parse data file {}: {e}",
                    self.data_path.display()
                )
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logger::log_store_default(&self.data_path);
                Ok(CubeData::default_faces())
            }
            Err(e) => Err(format!(
                "Failed to read data file {}: {e}",
                self.data_path.display()
            )),
        }
    }

    fn save(&self, data: &CubeData) -> Result<(), String> {
        let content = serde_json::to_string(data)
            .map_err(|e| format!("Failed to serialize face data: {e}"))?;

        fs::write(&self.data_path, content).map_err(|e| {
            format!(
                "Failed to write data file {}: {e}",
                self.data_path.display()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Face;

    fn temp_data_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cubeserve-{}-{tag}.json", std::process::id()))
    }

    #[test]
    fn test_missing_file_yields_default() {
        let path = temp_data_path("missing");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::new(&path);
        let data = store.load().unwrap();
        assert_eq!(data, CubeData::default_faces());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = temp_data_path("roundtrip");
        let store = JsonFileStore::new(&path);

        let mut data = CubeData::default();
        data.0.insert(
            "1".to_string(),
            Face {
                color: "red".to_string(),
                url: "http://x".to_string(),
            },
        );

        store.save(&data).unwrap();
        let loaded = store.load().unwrap();
        // Full replace: only the saved face comes back, no default merge
        assert_eq!(loaded, data);
        assert_eq!(loaded.0.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_overwrites_previous_document() {
        let path = temp_data_path("overwrite");
        let store = JsonFileStore::new(&path);

        store.save(&CubeData::default_faces()).unwrap();

        let mut replacement = CubeData::default();
        replacement.0.insert(
            "3".to_string(),
            Face {
                color: "blue".to_string(),
                url: String::new(),
            },
        );
        store.save(&replacement).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, replacement);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_data_path("malformed");
        fs::write(&path, "not json {").unwrap();

        let store = JsonFileStore::new(&path);
        let result = store.load();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to parse"));

        let _ = fs::remove_file(&path);
    }
}
