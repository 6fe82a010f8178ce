use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::entry::{CatalogEntry, CatalogEntryResource};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to fetch catalog: {0}")]
    FetchError(#[from] crate::api::ApiError),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub maps: Vec<CatalogEntryResource>,
}

/// Either the file envelope or the bare array returned by `GET /climatemap`
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Envelope(CatalogData),
    Bare(Vec<CatalogEntryResource>),
}

/// The in-memory layer catalog.
///
/// Entries keep the order in which the backend sent them; layer matching
/// relies on that order to pick the first matching entry.
#[derive(Debug, Clone)]
pub struct ClimateCatalog {
    /// All known layers, in backend order
    pub entries: Vec<CatalogEntry>,

    /// Index: data type -> index in entries vec
    data_type_to_index: HashMap<String, usize>,
}

impl ClimateCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            data_type_to_index: HashMap::new(),
        }
    }

    /// Load the embedded sample catalog
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time via build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/climate_maps.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a catalog file or a raw `/climatemap` response
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let resources = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::Envelope(data) => {
                // Version check (warn but don't fail)
                if data.version != CATALOG_VERSION {
                    tracing::warn!(
                        "Catalog version mismatch (expected {}, found {})",
                        CATALOG_VERSION,
                        data.version
                    );
                }
                data.maps
            }
            CatalogDocument::Bare(maps) => maps,
        };

        Ok(Self::from_resources(resources))
    }

    /// Build a catalog from wire resources, skipping malformed entries
    pub fn from_resources(resources: Vec<CatalogEntryResource>) -> Self {
        let mut catalog = Self::new();
        for resource in resources {
            let data_type = resource.data_type.clone();
            match CatalogEntry::try_from(resource) {
                Ok(entry) => catalog.add_entry(entry),
                Err(e) => tracing::warn!("Skipping catalog entry '{}': {}", data_type, e),
            }
        }
        tracing::debug!("Loaded {} catalog entries", catalog.len());
        catalog
    }

    /// Append an entry to the catalog
    pub fn add_entry(&mut self, entry: CatalogEntry) {
        let index = self.entries.len();
        // First entry wins for lookups, like matching does
        self.data_type_to_index
            .entry(entry.data_type.clone())
            .or_insert(index);
        self.entries.push(entry);
    }

    /// Get an entry by data type
    pub fn get(&self, data_type: &str) -> Option<&CatalogEntry> {
        self.data_type_to_index
            .get(data_type)
            .map(|&idx| &self.entries[idx])
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            maps: self.entries.iter().cloned().map(Into::into).collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of entries in catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ClimateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<CatalogEntry> for ClimateCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.add_entry(entry);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::ClimateVariable;
    use crate::core::types::SpatialResolution;
    use crate::core::year_range::YearSpan;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = ClimateCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_catalog_get_by_data_type() {
        let catalog = ClimateCatalog::load_embedded().unwrap();

        let entry = catalog.get("tmax_1970_2000_10m");
        assert!(entry.is_some());
        let entry = entry.unwrap();
        assert_eq!(entry.variable.name, "Tmax");
        assert!(entry.is_historical());
    }

    #[test]
    fn test_catalog_get_nonexistent() {
        let catalog = ClimateCatalog::load_embedded().unwrap();
        assert!(catalog.get("nonexistent_map").is_none());
    }

    #[test]
    fn test_catalog_to_json_roundtrip() {
        let catalog = ClimateCatalog::load_embedded().unwrap();
        let json = catalog.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"maps\""));

        let reloaded = ClimateCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.entries, catalog.entries);
    }

    #[test]
    fn test_bare_array_with_bad_entry_is_skipped() {
        let json = r#"[
            {"data_type": "ok", "year_range": [1970, 2000],
             "variable": {"name": "Tmax", "display_name": "Temperature Max", "unit": "°C"},
             "resolution": "10m", "tiles_url": "t", "colormap_url": "c",
             "max_zoom_raster": 4, "max_zoom_vector": 10},
            {"data_type": "bad", "year_range": [2021, 2040],
             "variable": {"name": "Tmax", "display_name": "Temperature Max", "unit": "°C"},
             "resolution": "10m", "tiles_url": "t", "colormap_url": "c",
             "max_zoom_raster": 4, "max_zoom_vector": 10,
             "climate_scenario": "SSP999", "climate_model": "ENSEMBLE_MEAN"}
        ]"#;
        let catalog = ClimateCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("ok").is_some());
        assert!(catalog.get("bad").is_none());
    }

    #[test]
    fn test_add_entry() {
        let mut catalog = ClimateCatalog::new();
        assert_eq!(catalog.len(), 0);

        let entry = CatalogEntry::new(
            "test_map",
            YearSpan::new(1970, 2000),
            ClimateVariable::new("Tmax", "Temperature Max", "°C"),
            SpatialResolution::Min10,
        );
        catalog.add_entry(entry);
        assert_eq!(catalog.len(), 1);

        let retrieved = catalog.get("test_map");
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().resolution, SpatialResolution::Min10);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            ClimateCatalog::from_json("{not json"),
            Err(CatalogError::ParseError(_))
        ));
    }
}
