use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Label returned for ids missing from the catalog.
pub const UNKNOWN_LABEL: &str = "Unknown";

const RECYCLING_CLASSES: [(i64, &str); 12] = [
    (0, "Paper"),
    (1, "Paper Pack"),
    (2, "Paper Cup"),
    (3, "Can"),
    (4, "Glass Bottle"),
    (5, "PET Bottle"),
    (6, "Plastic"),
    (7, "Vinyl"),
    (8, "Glass & Multi-layer Packaging"),
    (9, "PET & Multi-layer Packaging"),
    (10, "Styrofoam"),
    (11, "Battery"),
];

#[derive(Debug, Deserialize)]
struct CatalogFile {
    classes: BTreeMap<String, String>,
}

/// Read-only mapping from class id to label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    labels: BTreeMap<i64, String>,
}

impl ClassCatalog {
    /// The recycling classes the sorter model was trained on.
    pub fn recycling() -> Self {
        RECYCLING_CLASSES
            .iter()
            .map(|(id, label)| (*id, label.to_string()))
            .collect()
    }

    /// Parse a catalog from TOML:
    ///
    /// ```toml
    /// [classes]
    /// 0 = "Paper"
    /// 3 = "Can"
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| Error::Catalog(e.to_string()))?;

        let mut labels = BTreeMap::new();
        for (key, label) in file.classes {
            let id = key
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::Catalog(format!("class id '{}' is not an integer", key)))?;
            labels.insert(id, label);
        }

        Ok(Self { labels })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Label for `class_id`, or `"Unknown"`. Never fails.
    pub fn label_for(&self, class_id: i64) -> &str {
        self.labels
            .get(&class_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels.iter().map(|(id, label)| (*id, label.as_str()))
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::recycling()
    }
}

impl FromIterator<(i64, String)> for ClassCatalog {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}
