use serde::{Deserialize, Serialize};

use crate::core::types::{ClimateModel, ClimateScenario, ClimateVarKey, Month, SpatialResolution};
use crate::core::year_range::YearRange;

/// The user's current choice for every facet.
///
/// Owned by a single controller and mutated in place as the user interacts
/// or a URL is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    pub variable: ClimateVarKey,
    pub year_range: Option<YearRange>,
    pub resolution: SpatialResolution,
    pub scenario: Option<ClimateScenario>,
    pub model: Option<ClimateModel>,
    pub show_difference_map: bool,
    pub month: Month,
}

impl Default for FacetSelection {
    fn default() -> Self {
        Self {
            variable: ClimateVarKey::TMax,
            year_range: None,
            resolution: SpatialResolution::default(),
            scenario: None,
            model: None,
            show_difference_map: true,
            month: Month::current(),
        }
    }
}

impl FacetSelection {
    /// True when the selected year range is a projection
    #[must_use]
    pub fn is_future(&self) -> bool {
        self.year_range.as_ref().is_some_and(|r| !r.is_historical())
    }

    /// True when the selected year range is historical
    #[must_use]
    pub fn is_historical(&self) -> bool {
        self.year_range.as_ref().is_some_and(YearRange::is_historical)
    }
}
