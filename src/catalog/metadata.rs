//! Facet domains derived from the catalog.
//!
//! The domains are the full, canonically ordered set of values a user could
//! ever pick. Filtering against the current selection happens in
//! [`crate::facets::filter`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::store::ClimateCatalog;
use crate::core::entry::ClimateVariable;
use crate::core::types::{ClimateModel, ClimateScenario, ClimateVarKey, SpatialResolution};
use crate::core::year_range::{
    YearRange, YearSpan, MERGED_HISTORICAL_ALIAS, MERGED_HISTORICAL_PRIMARY,
};
use crate::facets::ordering::{dedup_stable, order_by_priority};

/// Variable configuration keyed by facet value, as published by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariableRegistry {
    variables: BTreeMap<ClimateVarKey, ClimateVariable>,
}

impl VariableRegistry {
    /// Collect one config per known variable; the first entry wins.
    ///
    /// Names without a [`ClimateVarKey`] are reported once and left out.
    pub fn from_catalog(catalog: &ClimateCatalog) -> Self {
        let mut registry = Self::default();
        let mut unknown: Vec<&str> = Vec::new();

        for entry in &catalog.entries {
            match ClimateVarKey::from_catalog_name(&entry.variable.name) {
                Some(key) => {
                    registry
                        .variables
                        .entry(key)
                        .or_insert_with(|| entry.variable.clone());
                }
                None => {
                    if !unknown.contains(&entry.variable.name.as_str()) {
                        unknown.push(&entry.variable.name);
                    }
                }
            }
        }

        for name in unknown {
            tracing::warn!("Unknown climate variable '{}' in catalog; ignoring", name);
        }

        registry
    }

    pub fn insert(&mut self, key: ClimateVarKey, variable: ClimateVariable) {
        self.variables.insert(key, variable);
    }

    pub fn get(&self, key: ClimateVarKey) -> Option<&ClimateVariable> {
        self.variables.get(&key)
    }

    /// Configured catalog name for a variable, if the catalog has it
    pub fn name_of(&self, key: ClimateVarKey) -> Option<&str> {
        self.get(key).map(|v| v.name.as_str())
    }

    /// Registered keys in canonical order
    pub fn keys(&self) -> Vec<ClimateVarKey> {
        order_by_priority(self.variables.keys().copied().collect(), &ClimateVarKey::ALL)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Build the year-range facet values present in the catalog.
///
/// Ranges are ordered by start year. When both historical baselines are
/// present they collapse into a single "1970-2000" option that also matches
/// 1961-1990 entries.
pub fn year_ranges(catalog: &ClimateCatalog) -> Vec<YearRange> {
    let mut spans: Vec<YearSpan> = dedup_stable(catalog.entries.iter().map(|e| e.year_range));
    spans.sort_by_key(|s| (s.start, s.end));

    let merge = spans.contains(&MERGED_HISTORICAL_PRIMARY) && spans.contains(&MERGED_HISTORICAL_ALIAS);

    let mut ranges: Vec<YearRange> = spans
        .into_iter()
        .filter(|s| !merge || (*s != MERGED_HISTORICAL_PRIMARY && *s != MERGED_HISTORICAL_ALIAS))
        .map(YearRange::new)
        .collect();

    if merge {
        ranges.push(YearRange::new(MERGED_HISTORICAL_PRIMARY).with_aliases([MERGED_HISTORICAL_ALIAS]));
        ranges.sort_by_key(|r| r.value.start);
    }

    ranges
}

/// The full ordered domain of every facet
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetDomains {
    pub variables: VariableRegistry,
    pub variable_keys: Vec<ClimateVarKey>,
    pub year_ranges: Vec<YearRange>,
    pub resolutions: Vec<SpatialResolution>,
    pub scenarios: Vec<ClimateScenario>,
    pub models: Vec<ClimateModel>,
}

impl FacetDomains {
    pub fn from_catalog(catalog: &ClimateCatalog) -> Self {
        let variables = VariableRegistry::from_catalog(catalog);
        let variable_keys = variables.keys();

        let resolutions = order_by_priority(
            dedup_stable(catalog.entries.iter().map(|e| e.resolution)),
            &SpatialResolution::ALL,
        );
        let scenarios = order_by_priority(
            dedup_stable(catalog.entries.iter().filter_map(|e| e.scenario())),
            &ClimateScenario::ALL,
        );
        let models = order_by_priority(
            dedup_stable(catalog.entries.iter().filter_map(|e| e.model())),
            &ClimateModel::ALL,
        );

        Self {
            variables,
            variable_keys,
            year_ranges: year_ranges(catalog),
            resolutions,
            scenarios,
            models,
        }
    }

    /// Find the year-range option covering `span`, by primary value or alias
    pub fn find_year_range(&self, span: YearSpan) -> Option<&YearRange> {
        self.year_ranges.iter().find(|r| r.matches(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::CatalogEntry;

    fn entry(name: &str, span: (i32, i32)) -> CatalogEntry {
        CatalogEntry::new(
            format!("{name}_{}_{}", span.0, span.1),
            span.into(),
            ClimateVariable::new(name, name, "u"),
            SpatialResolution::Min10,
        )
    }

    #[test]
    fn test_registry_skips_unknown_names() {
        let catalog: ClimateCatalog = [entry("Tmax", (1970, 2000)), entry("Humidity", (1970, 2000))]
            .into_iter()
            .collect();
        let registry = VariableRegistry::from_catalog(&catalog);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name_of(ClimateVarKey::TMax), Some("Tmax"));
        assert_eq!(registry.name_of(ClimateVarKey::TMin), None);
    }

    #[test]
    fn test_registry_keys_canonical_order() {
        let catalog: ClimateCatalog = [
            entry("Precipitation", (1970, 2000)),
            entry("CloudCover", (1961, 1990)),
            entry("Tmax", (1970, 2000)),
        ]
        .into_iter()
        .collect();
        let registry = VariableRegistry::from_catalog(&catalog);
        assert_eq!(
            registry.keys(),
            vec![
                ClimateVarKey::TMax,
                ClimateVarKey::Precipitation,
                ClimateVarKey::CloudCover
            ]
        );
    }

    #[test]
    fn test_year_ranges_merge_historical_baselines() {
        let catalog: ClimateCatalog = [
            entry("Tmax", (2081, 2100)),
            entry("Tmax", (1970, 2000)),
            entry("CloudCover", (1961, 1990)),
            entry("Tmax", (2021, 2040)),
        ]
        .into_iter()
        .collect();

        let ranges = year_ranges(&catalog);
        let labels: Vec<&str> = ranges.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1970-2000", "2021-2040", "2081-2100"]);
        assert_eq!(ranges[0].additional_values, vec![YearSpan::new(1961, 1990)]);
    }

    #[test]
    fn test_year_ranges_without_both_baselines_are_not_merged() {
        let catalog: ClimateCatalog = [entry("CloudCover", (1961, 1990)), entry("Tmax", (2021, 2040))]
            .into_iter()
            .collect();
        let ranges = year_ranges(&catalog);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].value, YearSpan::new(1961, 1990));
        assert!(ranges[0].additional_values.is_empty());
    }

    #[test]
    fn test_domains_from_embedded_catalog() {
        let catalog = ClimateCatalog::load_embedded().unwrap();
        let domains = FacetDomains::from_catalog(&catalog);

        assert_eq!(domains.variable_keys[0], ClimateVarKey::TMax);
        assert_eq!(
            domains.resolutions,
            vec![SpatialResolution::Min5, SpatialResolution::Min10, SpatialResolution::Min30]
        );
        assert_eq!(domains.scenarios, ClimateScenario::ALL.to_vec());
        assert_eq!(domains.models, vec![ClimateModel::EnsembleMean, ClimateModel::EcEarth3Veg]);
        assert!(domains.find_year_range(YearSpan::new(1961, 1990)).is_some());
        assert_eq!(
            domains.find_year_range(YearSpan::new(1961, 1990)).unwrap().label,
            "1970-2000"
        );
    }
}
