use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{ClimateModel, ClimateScenario, ParseError, SpatialResolution};
use crate::core::year_range::YearSpan;

/// Physical quantity shown by a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateVariable {
    pub name: String,
    pub display_name: String,
    pub unit: String,
}

impl ClimateVariable {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            unit: unit.into(),
        }
    }
}

/// Whether a layer holds observations or a CMIP6 projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Historical,
    Projected {
        scenario: ClimateScenario,
        model: ClimateModel,
    },
}

impl LayerKind {
    #[must_use]
    pub fn scenario(self) -> Option<ClimateScenario> {
        match self {
            Self::Historical => None,
            Self::Projected { scenario, .. } => Some(scenario),
        }
    }

    #[must_use]
    pub fn model(self) -> Option<ClimateModel> {
        match self {
            Self::Historical => None,
            Self::Projected { model, .. } => Some(model),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Entry '{0}' has a climate scenario without a model (or vice versa)")]
    PartialProjection(String),
}

/// Wire representation of a catalog entry as served by `GET /climatemap`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntryResource {
    pub data_type: String,
    pub year_range: YearSpan,
    pub variable: ClimateVariable,
    pub resolution: String,
    pub tiles_url: String,
    pub colormap_url: String,
    pub max_zoom_raster: u8,
    pub max_zoom_vector: u8,
    #[serde(default)]
    pub climate_scenario: Option<String>,
    #[serde(default)]
    pub climate_model: Option<String>,
    #[serde(default)]
    pub is_difference_map: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One pre-rendered layer advertised by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogEntryResource", into = "CatalogEntryResource")]
pub struct CatalogEntry {
    /// Identifier correlating with tile URL templates and the value API
    pub data_type: String,

    pub year_range: YearSpan,

    pub variable: ClimateVariable,

    pub resolution: SpatialResolution,

    /// Tile URL prefix; `_raster`/`_vector` and the month are appended
    pub tiles_url_base: String,

    pub colormap_url: String,

    pub max_zoom_raster: u8,

    pub max_zoom_vector: u8,

    pub kind: LayerKind,

    /// Entry encodes (future - historical) rather than an absolute value
    pub is_difference_map: bool,

    pub source: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        data_type: impl Into<String>,
        year_range: YearSpan,
        variable: ClimateVariable,
        resolution: SpatialResolution,
    ) -> Self {
        let data_type = data_type.into();
        Self {
            tiles_url_base: format!("/data/{data_type}"),
            colormap_url: format!("/colorbar/{data_type}"),
            data_type,
            year_range,
            variable,
            resolution,
            max_zoom_raster: 4,
            max_zoom_vector: 6,
            kind: LayerKind::Historical,
            is_difference_map: false,
            source: None,
        }
    }

    #[must_use]
    pub fn with_projection(mut self, scenario: ClimateScenario, model: ClimateModel) -> Self {
        self.kind = LayerKind::Projected { scenario, model };
        self
    }

    #[must_use]
    pub fn with_difference(mut self, is_difference_map: bool) -> Self {
        self.is_difference_map = is_difference_map;
        self
    }

    #[must_use]
    pub fn with_tiles_url(mut self, tiles_url_base: impl Into<String>) -> Self {
        self.tiles_url_base = tiles_url_base.into();
        self
    }

    #[must_use]
    pub fn scenario(&self) -> Option<ClimateScenario> {
        self.kind.scenario()
    }

    #[must_use]
    pub fn model(&self) -> Option<ClimateModel> {
        self.kind.model()
    }

    #[must_use]
    pub fn is_historical(&self) -> bool {
        self.kind == LayerKind::Historical
    }
}

impl TryFrom<CatalogEntryResource> for CatalogEntry {
    type Error = EntryError;

    fn try_from(resource: CatalogEntryResource) -> Result<Self, Self::Error> {
        let resolution = resource.resolution.parse::<SpatialResolution>()?;
        let kind = match (&resource.climate_scenario, &resource.climate_model) {
            (None, None) => LayerKind::Historical,
            (Some(scenario), Some(model)) => LayerKind::Projected {
                scenario: scenario.parse()?,
                model: model.parse()?,
            },
            _ => return Err(EntryError::PartialProjection(resource.data_type)),
        };

        Ok(Self {
            data_type: resource.data_type,
            year_range: resource.year_range,
            variable: resource.variable,
            resolution,
            tiles_url_base: resource.tiles_url,
            colormap_url: resource.colormap_url,
            max_zoom_raster: resource.max_zoom_raster,
            max_zoom_vector: resource.max_zoom_vector,
            kind,
            is_difference_map: resource.is_difference_map,
            source: resource.source,
        })
    }
}

impl From<CatalogEntry> for CatalogEntryResource {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            data_type: entry.data_type,
            year_range: entry.year_range,
            variable: entry.variable,
            resolution: entry.resolution.as_str().to_string(),
            tiles_url: entry.tiles_url_base,
            colormap_url: entry.colormap_url,
            max_zoom_raster: entry.max_zoom_raster,
            max_zoom_vector: entry.max_zoom_vector,
            climate_scenario: entry.kind.scenario().map(|s| s.as_str().to_string()),
            climate_model: entry.kind.model().map(|m| m.as_str().to_string()),
            is_difference_map: entry.is_difference_map,
            source: entry.source,
        }
    }
}
