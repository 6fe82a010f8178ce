use serde::{Deserialize, Serialize};

use crate::catalog::metadata::{FacetDomains, VariableRegistry};
use crate::catalog::store::ClimateCatalog;
use crate::core::entry::CatalogEntry;
use crate::core::selection::FacetSelection;
use crate::core::types::{ClimateModel, ClimateScenario, ClimateVarKey, SpatialResolution};
use crate::core::year_range::YearRange;
use crate::facets::ordering::order_by_priority;

/// How the difference-map toggle constrains year-range availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceRule {
    /// Toggle on accepts both absolute and difference entries; toggle off
    /// requires absolute entries
    #[default]
    PermissiveWhenOn,
    /// Entry difference state must always equal the toggle
    Strict,
}

/// Configuration for facet availability
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Applied by [`FacetFilter::available_year_ranges`] only
    pub year_range_difference_rule: DifferenceRule,
}

/// Every facet's currently selectable values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub variables: Vec<ClimateVarKey>,
    pub year_ranges: Vec<YearRange>,
    pub resolutions: Vec<SpatialResolution>,
    pub scenarios: Vec<ClimateScenario>,
    pub models: Vec<ClimateModel>,
}

/// Computes which facet values remain selectable given the other selections
pub struct FacetFilter<'a> {
    catalog: &'a ClimateCatalog,
    variables: &'a VariableRegistry,
    config: FilterConfig,
}

impl<'a> FacetFilter<'a> {
    pub fn new(catalog: &'a ClimateCatalog, variables: &'a VariableRegistry) -> Self {
        Self {
            catalog,
            variables,
            config: FilterConfig::default(),
        }
    }

    pub fn with_config(
        catalog: &'a ClimateCatalog,
        variables: &'a VariableRegistry,
        config: FilterConfig,
    ) -> Self {
        Self {
            catalog,
            variables,
            config,
        }
    }

    fn matches_variable(&self, entry: &CatalogEntry, key: ClimateVarKey) -> bool {
        self.variables
            .name_of(key)
            .is_some_and(|name| entry.variable.name == name)
    }

    /// Historical entries are never difference maps; projected entries must
    /// agree with the toggle.
    fn matches_difference(entry: &CatalogEntry, show_difference_map: bool, historical: bool) -> bool {
        if historical {
            return !entry.is_difference_map;
        }
        entry.is_difference_map == show_difference_map
    }

    /// Entries matching variable, year range and difference state.
    ///
    /// `historical` describes the selected year range, not the entry.
    fn base_filtered(
        &self,
        selection: &FacetSelection,
        year_range: &YearRange,
        historical: bool,
    ) -> impl Iterator<Item = &'a CatalogEntry> + '_ {
        let show = selection.show_difference_map;
        let variable = selection.variable;
        let year_range = year_range.clone();
        self.catalog.entries.iter().filter(move |entry| {
            self.matches_variable(entry, variable)
                && year_range.matches(entry.year_range)
                && Self::matches_difference(entry, show, historical)
        })
    }

    /// Variables with at least one catalog entry
    pub fn available_variables(&self, all: &[ClimateVarKey]) -> Vec<ClimateVarKey> {
        let available = all
            .iter()
            .copied()
            .filter(|&key| self.catalog.entries.iter().any(|e| self.matches_variable(e, key)))
            .collect();
        order_by_priority(available, &ClimateVarKey::ALL)
    }

    /// Year ranges with an entry for the selected variable and difference state
    pub fn available_year_ranges(
        &self,
        all: &[YearRange],
        selection: &FacetSelection,
    ) -> Vec<YearRange> {
        let mut available: Vec<YearRange> = all
            .iter()
            .filter(|range| {
                self.catalog.entries.iter().any(|entry| {
                    if !range.matches(entry.year_range) {
                        return false;
                    }
                    if !self.matches_variable(entry, selection.variable) {
                        return false;
                    }
                    if entry.is_historical() {
                        return !entry.is_difference_map;
                    }
                    match self.config.year_range_difference_rule {
                        DifferenceRule::PermissiveWhenOn if selection.show_difference_map => true,
                        _ => entry.is_difference_map == selection.show_difference_map,
                    }
                })
            })
            .cloned()
            .collect();
        available.sort_by_key(|r| r.value.start);
        available
    }

    /// Resolutions of entries matching every other selected facet
    pub fn available_resolutions(
        &self,
        all: &[SpatialResolution],
        selection: &FacetSelection,
    ) -> Vec<SpatialResolution> {
        let Some(year_range) = &selection.year_range else {
            return Vec::new();
        };
        let historical = year_range.is_historical();

        let entries: Vec<&CatalogEntry> = self
            .base_filtered(selection, year_range, historical)
            .filter(|entry| {
                if historical {
                    return true;
                }
                selection.scenario.is_none_or_eq(entry.scenario())
                    && selection.model.is_none_or_eq(entry.model())
            })
            .collect();

        let available = all
            .iter()
            .copied()
            .filter(|&res| entries.iter().any(|e| e.resolution == res))
            .collect();
        order_by_priority(available, &SpatialResolution::ALL)
    }

    /// Scenarios available for a projected year range; empty for historical
    pub fn available_scenarios(
        &self,
        all: &[ClimateScenario],
        selection: &FacetSelection,
    ) -> Vec<ClimateScenario> {
        let Some(year_range) = &selection.year_range else {
            return Vec::new();
        };
        if year_range.is_historical() {
            return Vec::new();
        }

        let entries: Vec<&CatalogEntry> = self.base_filtered(selection, year_range, false).collect();

        let available = all
            .iter()
            .copied()
            .filter(|&scenario| entries.iter().any(|e| e.scenario() == Some(scenario)))
            .collect();
        order_by_priority(available, &ClimateScenario::ALL)
    }

    /// Models available for a projected year range and the selected scenario
    pub fn available_models(
        &self,
        all: &[ClimateModel],
        selection: &FacetSelection,
    ) -> Vec<ClimateModel> {
        let Some(year_range) = &selection.year_range else {
            return Vec::new();
        };
        if year_range.is_historical() {
            return Vec::new();
        }

        let entries: Vec<&CatalogEntry> = self
            .base_filtered(selection, year_range, false)
            .filter(|entry| selection.scenario.is_none_or_eq(entry.scenario()))
            .collect();

        let available = all
            .iter()
            .copied()
            .filter(|&model| entries.iter().any(|e| e.model() == Some(model)))
            .collect();
        order_by_priority(available, &ClimateModel::ALL)
    }

    /// All availability lists for the current selection
    pub fn options(&self, domains: &FacetDomains, selection: &FacetSelection) -> FacetOptions {
        FacetOptions {
            variables: self.available_variables(&domains.variable_keys),
            year_ranges: self.available_year_ranges(&domains.year_ranges, selection),
            resolutions: self.available_resolutions(&domains.resolutions, selection),
            scenarios: self.available_scenarios(&domains.scenarios, selection),
            models: self.available_models(&domains.models, selection),
        }
    }
}

/// An unset facet accepts anything; a set facet requires equality
trait OptionalFacet<T> {
    fn is_none_or_eq(&self, candidate: Option<T>) -> bool;
}

impl<T: PartialEq + Copy> OptionalFacet<T> for Option<T> {
    fn is_none_or_eq(&self, candidate: Option<T>) -> bool {
        match self {
            None => true,
            Some(wanted) => candidate == Some(*wanted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::ClimateVariable;
    use crate::core::types::Month;
    use crate::core::year_range::YearSpan;

    fn tmax() -> ClimateVariable {
        ClimateVariable::new("Tmax", "Temperature Max", "°C")
    }

    fn make_catalog() -> ClimateCatalog {
        [
            CatalogEntry::new("hist_10m", YearSpan::new(1970, 2000), tmax(), SpatialResolution::Min10),
            CatalogEntry::new("hist_5m", YearSpan::new(1970, 2000), tmax(), SpatialResolution::Min5),
            CatalogEntry::new("fut_abs", YearSpan::new(2081, 2100), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp126, ClimateModel::EnsembleMean),
            CatalogEntry::new("fut_diff", YearSpan::new(2081, 2100), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp370, ClimateModel::EnsembleMean)
                .with_difference(true),
            CatalogEntry::new("fut_diff_ec", YearSpan::new(2081, 2100), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp585, ClimateModel::EcEarth3Veg)
                .with_difference(true),
            CatalogEntry::new("fut_only_abs", YearSpan::new(2021, 2040), tmax(), SpatialResolution::Min10)
                .with_projection(ClimateScenario::Ssp245, ClimateModel::EnsembleMean),
        ]
        .into_iter()
        .collect()
    }

    fn selection(span: Option<(i32, i32)>, show_difference_map: bool) -> FacetSelection {
        FacetSelection {
            year_range: span.map(|s| YearRange::new(s.into())),
            show_difference_map,
            month: Month::new(1).unwrap(),
            ..FacetSelection::default()
        }
    }

    #[test]
    fn test_available_variables() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);
        let all = [ClimateVarKey::Precipitation, ClimateVarKey::TMax];
        assert_eq!(filter.available_variables(&all), vec![ClimateVarKey::TMax]);
    }

    #[test]
    fn test_year_ranges_permissive_when_difference_on() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let on = filter.available_year_ranges(&domains.year_ranges, &selection(None, true));
        let labels: Vec<_> = on.iter().map(|r| r.label.as_str()).collect();
        // 2021-2040 only has an absolute entry but is accepted with the toggle on
        assert_eq!(labels, vec!["1970-2000", "2021-2040", "2081-2100"]);

        let off = filter.available_year_ranges(&domains.year_ranges, &selection(None, false));
        let labels: Vec<_> = off.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1970-2000", "2021-2040", "2081-2100"]);
    }

    #[test]
    fn test_year_ranges_strict_rule() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let config = FilterConfig {
            year_range_difference_rule: DifferenceRule::Strict,
        };
        let filter = FacetFilter::with_config(&catalog, &domains.variables, config);

        let on = filter.available_year_ranges(&domains.year_ranges, &selection(None, true));
        let labels: Vec<_> = on.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1970-2000", "2081-2100"]);
    }

    #[test]
    fn test_resolutions_historical_ignores_scenario() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let mut sel = selection(Some((1970, 2000)), true);
        sel.scenario = Some(ClimateScenario::Ssp585);
        assert_eq!(
            filter.available_resolutions(&SpatialResolution::ALL, &sel),
            vec![SpatialResolution::Min5, SpatialResolution::Min10]
        );
    }

    #[test]
    fn test_resolutions_future_respects_scenario_and_model() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let mut sel = selection(Some((2081, 2100)), true);
        sel.scenario = Some(ClimateScenario::Ssp370);
        sel.model = Some(ClimateModel::EcEarth3Veg);
        assert!(filter.available_resolutions(&SpatialResolution::ALL, &sel).is_empty());

        sel.model = Some(ClimateModel::EnsembleMean);
        assert_eq!(
            filter.available_resolutions(&SpatialResolution::ALL, &sel),
            vec![SpatialResolution::Min10]
        );
    }

    #[test]
    fn test_scenarios_and_models() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let mut sel = selection(Some((2081, 2100)), true);
        assert_eq!(
            filter.available_scenarios(&ClimateScenario::ALL, &sel),
            vec![ClimateScenario::Ssp370, ClimateScenario::Ssp585]
        );
        assert_eq!(
            filter.available_models(&ClimateModel::ALL, &sel),
            vec![ClimateModel::EnsembleMean, ClimateModel::EcEarth3Veg]
        );

        sel.scenario = Some(ClimateScenario::Ssp585);
        assert_eq!(
            filter.available_models(&ClimateModel::ALL, &sel),
            vec![ClimateModel::EcEarth3Veg]
        );

        sel.show_difference_map = false;
        sel.scenario = None;
        assert_eq!(
            filter.available_scenarios(&ClimateScenario::ALL, &sel),
            vec![ClimateScenario::Ssp126]
        );
    }

    #[test]
    fn test_historical_has_no_scenarios_or_models() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let sel = selection(Some((1970, 2000)), false);
        assert!(filter.available_scenarios(&ClimateScenario::ALL, &sel).is_empty());
        assert!(filter.available_models(&ClimateModel::ALL, &sel).is_empty());
    }

    #[test]
    fn test_missing_year_range_yields_empty_lists() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let sel = selection(None, true);
        assert!(filter.available_resolutions(&SpatialResolution::ALL, &sel).is_empty());
        assert!(filter.available_scenarios(&ClimateScenario::ALL, &sel).is_empty());
        assert!(filter.available_models(&ClimateModel::ALL, &sel).is_empty());
    }

    #[test]
    fn test_empty_catalog_yields_empty_options() {
        let catalog = ClimateCatalog::new();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);
        let sel = selection(Some((2081, 2100)), true);

        assert_eq!(filter.options(&domains, &sel), FacetOptions::default());
        // Even when handed a full domain
        assert!(filter.available_variables(&ClimateVarKey::ALL).is_empty());
        assert!(filter.available_scenarios(&ClimateScenario::ALL, &sel).is_empty());
    }

    #[test]
    fn test_output_follows_canonical_order() {
        let catalog = make_catalog();
        let domains = FacetDomains::from_catalog(&catalog);
        let filter = FacetFilter::new(&catalog, &domains.variables);

        let sel = selection(Some((2081, 2100)), true);
        let shuffled = [ClimateScenario::Ssp585, ClimateScenario::Ssp126, ClimateScenario::Ssp370];
        assert_eq!(
            filter.available_scenarios(&shuffled, &sel),
            vec![ClimateScenario::Ssp370, ClimateScenario::Ssp585]
        );
    }
}
