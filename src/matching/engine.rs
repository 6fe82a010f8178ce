use serde::Serialize;

use crate::catalog::metadata::VariableRegistry;
use crate::catalog::store::ClimateCatalog;
use crate::core::entry::CatalogEntry;
use crate::core::selection::FacetSelection;
use crate::core::types::{ClimateScenario, Month};
use crate::core::year_range::{YearRange, MERGED_HISTORICAL_PRIMARY};
use crate::matching::layer::LayerOption;

/// Facet values substituted for a single grid cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOverride {
    pub year_range: Option<YearRange>,
    pub scenario: Option<ClimateScenario>,
}

impl FacetOverride {
    pub fn year_range(year_range: YearRange) -> Self {
        Self {
            year_range: Some(year_range),
            scenario: None,
        }
    }

    pub fn scenario(scenario: ClimateScenario) -> Self {
        Self {
            year_range: None,
            scenario: Some(scenario),
        }
    }
}

/// Key of a cell in the scenario x year-range grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioPeriod {
    pub scenario: ClimateScenario,
    pub year_range: YearRange,
}

/// One cell of a comparison grid; `layer` is `None` when nothing matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell<K> {
    pub key: K,
    pub layer: Option<LayerOption>,
}

/// One month of the monthly grid.
///
/// Every cell shows the same layer; the templates point at that month's
/// tiles and are `None` when the selection has no layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCell {
    pub month: Month,
    pub label: &'static str,
    pub raster_template: Option<String>,
    pub vector_template: Option<String>,
    pub layer: Option<LayerOption>,
}

/// Resolves a facet selection to exactly one catalog entry
pub struct LayerMatcher<'a> {
    catalog: &'a ClimateCatalog,
    variables: &'a VariableRegistry,
}

impl<'a> LayerMatcher<'a> {
    pub fn new(catalog: &'a ClimateCatalog, variables: &'a VariableRegistry) -> Self {
        Self { catalog, variables }
    }

    fn entry_matches(
        &self,
        entry: &CatalogEntry,
        selection: &FacetSelection,
        year_range: &YearRange,
        scenario: Option<ClimateScenario>,
    ) -> bool {
        // Step 1: variable
        let Some(name) = self.variables.name_of(selection.variable) else {
            return false;
        };
        if entry.variable.name != name {
            return false;
        }

        // Step 2: year range, primary or alias
        if !year_range.matches(entry.year_range) {
            return false;
        }

        // Step 3: resolution
        if entry.resolution != selection.resolution {
            return false;
        }

        // Step 4: historical and projected branches
        if year_range.is_historical() {
            return entry.is_historical() && !entry.is_difference_map;
        }
        if entry.is_difference_map != selection.show_difference_map {
            return false;
        }
        if scenario.is_some_and(|s| entry.scenario() != Some(s)) {
            return false;
        }
        if selection.model.is_some_and(|m| entry.model() != Some(m)) {
            return false;
        }
        true
    }

    /// First catalog entry matching the selection with `overrides` applied
    pub fn find_entry_with(
        &self,
        selection: &FacetSelection,
        overrides: &FacetOverride,
    ) -> Option<&'a CatalogEntry> {
        let year_range = overrides
            .year_range
            .as_ref()
            .or(selection.year_range.as_ref())?;
        let scenario = overrides.scenario.or(selection.scenario);

        self.catalog
            .entries
            .iter()
            .find(|entry| self.entry_matches(entry, selection, year_range, scenario))
    }

    /// First catalog entry matching the selection
    pub fn find_entry(&self, selection: &FacetSelection) -> Option<&'a CatalogEntry> {
        self.find_entry_with(selection, &FacetOverride::default())
    }

    /// The layer to render for a selection, if any
    pub fn find_layer(&self, selection: &FacetSelection) -> Option<LayerOption> {
        self.find_layer_with(selection, &FacetOverride::default())
    }

    /// The layer for a selection with one or more facets substituted
    pub fn find_layer_with(
        &self,
        selection: &FacetSelection,
        overrides: &FacetOverride,
    ) -> Option<LayerOption> {
        let found = self.find_entry_with(selection, overrides).map(LayerOption::from);
        if found.is_none() {
            tracing::debug!(
                "No layer for {} {:?} {} (override {:?})",
                selection.variable,
                selection.year_range.as_ref().map(|r| r.label.as_str()),
                selection.resolution,
                overrides
            );
        }
        found
    }

    /// One cell per scenario; empty unless a projected year range is selected
    pub fn scenario_cells(
        &self,
        selection: &FacetSelection,
        scenarios: &[ClimateScenario],
    ) -> Vec<GridCell<ClimateScenario>> {
        if !selection.is_future() {
            return Vec::new();
        }
        scenarios
            .iter()
            .map(|&scenario| GridCell {
                key: scenario,
                layer: self.find_layer_with(selection, &FacetOverride::scenario(scenario)),
            })
            .collect()
    }

    /// One cell per year range, leaving out the 1970-2000 baseline
    pub fn year_range_cells(
        &self,
        selection: &FacetSelection,
        year_ranges: &[YearRange],
    ) -> Vec<GridCell<YearRange>> {
        year_ranges
            .iter()
            .filter(|r| r.value != MERGED_HISTORICAL_PRIMARY)
            .map(|year_range| GridCell {
                key: year_range.clone(),
                layer: self.find_layer_with(selection, &FacetOverride::year_range(year_range.clone())),
            })
            .collect()
    }

    /// Scenario-major cells for every scenario and projected year range
    pub fn scenario_year_range_cells(
        &self,
        selection: &FacetSelection,
        scenarios: &[ClimateScenario],
        year_ranges: &[YearRange],
    ) -> Vec<GridCell<ScenarioPeriod>> {
        let future: Vec<&YearRange> = year_ranges.iter().filter(|r| !r.is_historical()).collect();

        let mut cells = Vec::with_capacity(scenarios.len() * future.len());
        for &scenario in scenarios {
            for year_range in &future {
                let overrides = FacetOverride {
                    year_range: Some((*year_range).clone()),
                    scenario: Some(scenario),
                };
                cells.push(GridCell {
                    key: ScenarioPeriod {
                        scenario,
                        year_range: (*year_range).clone(),
                    },
                    layer: self.find_layer_with(selection, &overrides),
                });
            }
        }
        cells
    }

    /// Twelve cells in seasonal order, December first, all showing the
    /// selection's layer
    pub fn monthly_cells(&self, selection: &FacetSelection) -> Vec<MonthlyCell> {
        let layer = self.find_layer(selection);
        Month::seasonal()
            .map(|month| MonthlyCell {
                month,
                label: month.name(),
                raster_template: layer.as_ref().map(|l| l.raster_template(month)),
                vector_template: layer.as_ref().map(|l| l.vector_template(month)),
                layer: layer.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::metadata::FacetDomains;
    use crate::core::entry::ClimateVariable;
    use crate::core::types::{ClimateModel, ClimateVarKey, Month, SpatialResolution};
    use crate::core::year_range::YearSpan;

    fn tmax() -> ClimateVariable {
        ClimateVariable::new("Tmax", "Temperature Max", "°C")
    }

    fn make_catalog() -> ClimateCatalog {
        [
            CatalogEntry::new("hist", YearSpan::new(1970, 2000), tmax(), SpatialResolution::Min10),
            CatalogEntry::new("cru", YearSpan::new(1961, 1990), tmax(), SpatialResolution::Min30),
            CatalogEntry::new("ssp370_diff", YearSpan::new(2081, 2100), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp370, ClimateModel::EnsembleMean)
                .with_difference(true),
            CatalogEntry::new("ssp585_diff", YearSpan::new(2081, 2100), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp585, ClimateModel::EnsembleMean)
                .with_difference(true),
            CatalogEntry::new("ssp370_2041", YearSpan::new(2041, 2060), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp370, ClimateModel::EnsembleMean)
                .with_difference(true),
        ]
        .into_iter()
        .collect()
    }

    fn selection(domains: &FacetDomains, span: (i32, i32)) -> FacetSelection {
        FacetSelection {
            variable: ClimateVarKey::TMax,
            year_range: domains.find_year_range(span.into()).cloned(),
            resolution: SpatialResolution::Min10,
            month: Month::new(1).unwrap(),
            ..FacetSelection::default()
        }
    }

    #[test]
    fn test_historical_match() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let sel = selection(&domains, (1970, 2000));
        assert_eq!(matcher.find_entry(&sel).unwrap().data_type, "hist");
    }

    #[test]
    fn test_alias_match() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        // The merged 1970-2000 option also reaches the 1961-1990 entry
        let mut sel = selection(&domains, (1961, 1990));
        sel.resolution = SpatialResolution::Min30;
        assert_eq!(matcher.find_entry(&sel).unwrap().data_type, "cru");
    }

    #[test]
    fn test_future_first_match_wins_without_scenario() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let sel = selection(&domains, (2081, 2100));
        assert_eq!(matcher.find_entry(&sel).unwrap().data_type, "ssp370_diff");
    }

    #[test]
    fn test_future_difference_mismatch_is_none() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let mut sel = selection(&domains, (2081, 2100));
        sel.show_difference_map = false;
        assert!(matcher.find_layer(&sel).is_none());
    }

    #[test]
    fn test_model_mismatch_is_none() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let mut sel = selection(&domains, (2081, 2100));
        sel.model = Some(ClimateModel::Miroc6);
        assert!(matcher.find_layer(&sel).is_none());
    }

    #[test]
    fn test_missing_year_range_is_none() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let mut sel = selection(&domains, (2081, 2100));
        sel.year_range = None;
        assert!(matcher.find_layer(&sel).is_none());
    }

    #[test]
    fn test_override_substitutes_scenario() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let mut sel = selection(&domains, (2081, 2100));
        sel.scenario = Some(ClimateScenario::Ssp370);
        let layer = matcher
            .find_layer_with(&sel, &FacetOverride::scenario(ClimateScenario::Ssp585))
            .unwrap();
        assert_eq!(layer.entry.data_type, "ssp585_diff");
        // The selection itself is untouched
        assert_eq!(sel.scenario, Some(ClimateScenario::Ssp370));
    }

    #[test]
    fn test_scenario_cells() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let sel = selection(&domains, (2081, 2100));
        let cells = matcher.scenario_cells(&sel, &ClimateScenario::ALL);
        assert_eq!(cells.len(), 4);
        assert!(cells[0].layer.is_none());
        assert_eq!(cells[2].layer.as_ref().unwrap().entry.data_type, "ssp370_diff");
        assert_eq!(cells[3].layer.as_ref().unwrap().entry.data_type, "ssp585_diff");

        let historical = selection(&domains, (1970, 2000));
        assert!(matcher.scenario_cells(&historical, &ClimateScenario::ALL).is_empty());
    }

    #[test]
    fn test_year_range_cells_skip_baseline() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let mut sel = selection(&domains, (2081, 2100));
        sel.scenario = Some(ClimateScenario::Ssp370);
        let cells = matcher.year_range_cells(&sel, &domains.year_ranges);
        let labels: Vec<&str> = cells.iter().map(|c| c.key.label.as_str()).collect();
        assert_eq!(labels, vec!["2041-2060", "2081-2100"]);
        assert!(cells.iter().all(|c| c.layer.is_some()));
    }

    #[test]
    fn test_scenario_year_range_cells() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let sel = selection(&domains, (2081, 2100));
        let scenarios = [ClimateScenario::Ssp370, ClimateScenario::Ssp585];
        let cells = matcher.scenario_year_range_cells(&sel, &scenarios, &domains.year_ranges);

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].key.scenario, ClimateScenario::Ssp370);
        assert_eq!(cells[0].key.year_range.label, "2041-2060");
        assert!(cells[0].layer.is_some());
        assert_eq!(cells[2].key.scenario, ClimateScenario::Ssp585);
        assert!(cells[2].layer.is_none());
        assert_eq!(cells[3].layer.as_ref().unwrap().entry.data_type, "ssp585_diff");
    }

    #[test]
    fn test_monthly_cells_follow_seasons() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let matcher = LayerMatcher::new(&catalog, &domains.variables);

        let sel = selection(&domains, (1970, 2000));
        let cells = matcher.monthly_cells(&sel);
        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0].label, "December");
        assert_eq!(cells[1].label, "January");
        assert_eq!(
            cells[0].raster_template.as_deref(),
            Some("/data/hist_raster_12/{z}/{x}/{y}.png")
        );
        assert_eq!(
            cells[7].vector_template.as_deref(),
            Some("/data/hist_vector_7/{z}/{x}/{y}.pbf")
        );
        assert!(cells
            .iter()
            .all(|c| c.layer.as_ref().map(|l| l.entry.data_type.as_str()) == Some("hist")));

        let mut unmatched = sel.clone();
        unmatched.resolution = SpatialResolution::Min2_5;
        let cells = matcher.monthly_cells(&unmatched);
        assert_eq!(cells.len(), 12);
        assert!(cells.iter().all(|c| c.layer.is_none() && c.raster_template.is_none()));
    }
}
