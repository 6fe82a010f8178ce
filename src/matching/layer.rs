use serde::{Deserialize, Serialize};

use crate::core::entry::CatalogEntry;
use crate::core::types::Month;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Path suffix "z/x/y"
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A renderable layer built from a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerOption {
    /// Human-readable layer name
    pub name: String,
    /// Base URL of the raster tile pyramid (month suffix not applied)
    pub raster_url: String,
    /// Base URL of the vector (contour) tile pyramid
    pub vector_url: String,
    pub raster_max_zoom: u8,
    pub vector_max_zoom: u8,
    /// The catalog entry this layer renders
    pub entry: CatalogEntry,
}

impl LayerOption {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let mut name = format!("{} ({})", entry.variable.display_name, entry.variable.unit);
        if let (Some(scenario), Some(model)) = (entry.scenario(), entry.model()) {
            name.push_str(&format!(" - {model} {scenario}"));
        }

        Self {
            name,
            raster_url: format!("{}_raster", entry.tiles_url_base),
            vector_url: format!("{}_vector", entry.tiles_url_base),
            raster_max_zoom: entry.max_zoom_raster,
            vector_max_zoom: entry.max_zoom_vector,
            entry: entry.clone(),
        }
    }

    /// Raster tile URL template for a month, e.g. `.../tmax_raster_7/{z}/{x}/{y}.png`
    pub fn raster_template(&self, month: Month) -> String {
        format!("{}_{month}/{{z}}/{{x}}/{{y}}.png", self.raster_url)
    }

    /// Vector tile URL template for a month
    pub fn vector_template(&self, month: Month) -> String {
        format!("{}_{month}/{{z}}/{{x}}/{{y}}.pbf", self.vector_url)
    }

    /// Concrete raster tile URL, or `None` past the raster zoom cap
    pub fn raster_tile_url(&self, month: Month, tile: TileCoord) -> Option<String> {
        if tile.z > u32::from(self.raster_max_zoom) {
            return None;
        }
        Some(format!("{}_{month}/{}.png", self.raster_url, tile.path()))
    }

    /// Concrete vector tile URL, or `None` past the vector zoom cap
    pub fn vector_tile_url(&self, month: Month, tile: TileCoord) -> Option<String> {
        if tile.z > u32::from(self.vector_max_zoom) {
            return None;
        }
        Some(format!("{}_{month}/{}.pbf", self.vector_url, tile.path()))
    }
}

impl From<&CatalogEntry> for LayerOption {
    fn from(entry: &CatalogEntry) -> Self {
        Self::from_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::ClimateVariable;
    use crate::core::types::{ClimateModel, ClimateScenario, SpatialResolution};
    use crate::core::year_range::YearSpan;

    fn entry() -> CatalogEntry {
        CatalogEntry::new(
            "tmax_2081_2100_10m_ssp370_ensemble_mean",
            YearSpan::new(2081, 2100),
            ClimateVariable::new("Tmax", "Temperature Max", "°C"),
            SpatialResolution::Min10,
        )
        .with_tiles_url("http://tiles/data/tmax")
    }

    #[test]
    fn test_historical_layer_name() {
        let layer = LayerOption::from_entry(&entry());
        assert_eq!(layer.name, "Temperature Max (°C)");
        assert_eq!(layer.raster_url, "http://tiles/data/tmax_raster");
        assert_eq!(layer.vector_url, "http://tiles/data/tmax_vector");
    }

    #[test]
    fn test_projected_layer_name() {
        let e = entry().with_projection(ClimateScenario::Ssp370, ClimateModel::EnsembleMean);
        let layer = LayerOption::from(&e);
        assert_eq!(layer.name, "Temperature Max (°C) - ENSEMBLE_MEAN SSP370");
    }

    #[test]
    fn test_templates() {
        let layer = LayerOption::from_entry(&entry());
        let july = Month::new(7).unwrap();
        assert_eq!(
            layer.raster_template(july),
            "http://tiles/data/tmax_raster_7/{z}/{x}/{y}.png"
        );
        assert_eq!(
            layer.vector_template(july),
            "http://tiles/data/tmax_vector_7/{z}/{x}/{y}.pbf"
        );
    }

    #[test]
    fn test_tile_urls_respect_zoom_caps() {
        let layer = LayerOption::from_entry(&entry());
        let jan = Month::new(1).unwrap();

        assert_eq!(
            layer.raster_tile_url(jan, TileCoord::new(3, 4, 2)).as_deref(),
            Some("http://tiles/data/tmax_raster_1/3/4/2.png")
        );
        // Default caps are 4 (raster) and 6 (vector)
        assert!(layer.raster_tile_url(jan, TileCoord::new(5, 0, 0)).is_none());
        assert!(layer.vector_tile_url(jan, TileCoord::new(5, 0, 0)).is_some());
        assert!(layer.vector_tile_url(jan, TileCoord::new(7, 0, 0)).is_none());
    }
}
