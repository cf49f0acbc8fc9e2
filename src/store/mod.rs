// Face data store module
// Defines the persisted document types and the storage interface

mod file;
mod memory;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// One labeled face of the viewer: a display color and an embedded page URL
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Face {
    pub color: String,
    pub url: String,
}

/// The persisted document: face id ("1".."6") mapped to its `Face`
///
/// `BTreeMap` keeps the emitted JSON in stable key order. The store does not
/// enforce the six-face shape on load or save; it round-trips whatever map
/// the caller supplies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct CubeData(pub BTreeMap<String, Face>);

impl CubeData {
    /// The document generated when no data has been saved yet:
    /// faces 1 through 6, white, no URL
    pub fn default_faces() -> Self {
        let faces = (1..=6)
            .map(|id| {
                (
                    id.to_string(),
                    Face {
                        color: "white".to_string(),
                        url: String::new(),
                    },
                )
            })
            .collect();
        Self(faces)
    }
}

/// Storage interface for the face document
///
/// Call sites only see `load`/`save`, so the backing medium can be swapped
/// (file on disk in production, in-memory for tests) without touching them.
/// Every save is a full replace of the document, never a merge.
pub trait FaceStore: Send + Sync {
    /// Load the current document. A store with no saved data yet returns
    /// the default six-face structure.
    fn load(&self) -> Result<CubeData, String>;

    /// Overwrite the stored document with `data` in full.
    fn save(&self, data: &CubeData) -> Result<(), String>;
}
