use serde::{Deserialize, Serialize};

/// A place returned by `GET /geocode`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingLocation {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Place kind such as "country", "city" or "village"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Vec<f64>>,
}

impl GeocodingLocation {
    /// Bounding box as `[south, north, west, east]` when all four edges are present
    pub fn bounds(&self) -> Option<[f64; 4]> {
        match self.bounding_box.as_deref() {
            Some(&[a, b, c, d]) => Some([a, b, c, d]),
            _ => None,
        }
    }

    /// Map zoom level that frames this kind of place
    pub fn zoom_level(&self) -> u8 {
        match self.kind.to_ascii_lowercase().as_str() {
            "country" => 5,
            "state" => 6,
            _ => 7,
        }
    }
}

/// Layer value at a point, from `GET /value/{data_type}/{month}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    /// Missing over oceans and outside the layer's extent
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Closest named place, from `GET /nearest-city`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Legend definition, from `GET /colorbar/{data_type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colorbar {
    /// Level boundaries, ascending
    pub levels: Vec<f64>,
    /// RGBA colors with channels in 0.0..=1.0
    pub colors: Vec<[f64; 4]>,
    #[serde(default)]
    pub log_scale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Colorbar {
    /// Color of the band containing `value`, clamped to the end bands
    pub fn color_for(&self, value: f64) -> Option<[f64; 4]> {
        if self.colors.is_empty() {
            return None;
        }
        let band = self.levels.iter().take_while(|&&level| level <= value).count();
        let index = band.saturating_sub(1).min(self.colors.len() - 1);
        self.colors.get(index).copied()
    }
}
