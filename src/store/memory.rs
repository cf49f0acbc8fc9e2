// In-memory store
// Backing store with no disk persistence, used by tests and embeddings

use std::sync::Mutex;

use super::{CubeData, FaceStore};

/// In-memory implementation of `FaceStore`
///
/// Starts with no saved document, mirroring a file store whose backing file
/// does not exist yet.
#[allow(dead_code)]
pub struct MemoryStore {
    data: Mutex<Option<CubeData>>,
}

impl MemoryStore {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(None),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceStore for MemoryStore {
    fn load(&self) -> Result<CubeData, String> {
        let data = self
            .data
            .lock()
            .map_err(|_| "Face data lock poisoned".to_string())?;
        Ok(data.clone().unwrap_or_else(CubeData::default_faces))
    }

    fn save(&self, data: &CubeData) -> Result<(), String> {
        let mut slot = self
            .data
            .lock()
            .map_err(|_| "Face data lock poisoned".to_string())?;
        *slot = Some(data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Face;

    #[test]
    fn test_cold_store_yields_default() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), CubeData::default_faces());
    }

    #[test]
    fn test_save_replaces_instead_of_merging() {
        let store = MemoryStore::new();

        let mut data = CubeData::default();
        data.0.insert(
            "2".to_string(),
            Face {
                color: "green".to_string(),
                url: "http://example.com".to_string(),
            },
        );
        store.save(&data).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, data);
        assert!(!loaded.0.contains_key("1"));
    }
}
