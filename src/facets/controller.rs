use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::catalog::metadata::FacetDomains;
use crate::catalog::store::ClimateCatalog;
use crate::core::selection::FacetSelection;
use crate::core::types::{ClimateModel, ClimateScenario, ParseError, SpatialResolution};
use crate::core::year_range::YearRange;
use crate::facets::filter::{FacetFilter, FacetOptions, FilterConfig};
use crate::matching::engine::{GridCell, LayerMatcher, MonthlyCell, ScenarioPeriod};
use crate::matching::layer::LayerOption;
use crate::url_state::{decode_controls, encode_controls, update_url_params, UrlControls};

/// The view a controller drives; each has its own defaults and reset rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// Single map
    #[default]
    Map,
    /// One map per scenario for the selected year range
    ScenarioGrid,
    /// One map per year range for the selected scenario
    YearRangeGrid,
    /// Scenarios by projected year ranges
    ScenarioYearRangeGrid,
    /// The selected layer for every month, December first
    MonthlyGrid,
}

impl PageKind {
    pub const ALL: [Self; 5] = [
        Self::Map,
        Self::ScenarioGrid,
        Self::YearRangeGrid,
        Self::ScenarioYearRangeGrid,
        Self::MonthlyGrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::ScenarioGrid => "scenario-grid",
            Self::YearRangeGrid => "year-range-grid",
            Self::ScenarioYearRangeGrid => "scenario-year-range-grid",
            Self::MonthlyGrid => "monthly-grid",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PageKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseError::UnknownValue {
                facet: "page",
                value: s.to_string(),
            })
    }
}

/// Fallback values used when a facet must be filled in
#[derive(Debug, Clone)]
pub struct ControllerDefaults {
    pub resolution: SpatialResolution,
    pub scenario: ClimateScenario,
    pub model: ClimateModel,
}

impl Default for ControllerDefaults {
    fn default() -> Self {
        Self {
            resolution: SpatialResolution::Min10,
            scenario: ClimateScenario::Ssp370,
            model: ClimateModel::EnsembleMean,
        }
    }
}

/// Cells of whichever grid the page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "cells", rename_all = "kebab-case")]
pub enum GridCells {
    Map(Option<LayerOption>),
    ScenarioGrid(Vec<GridCell<ClimateScenario>>),
    YearRangeGrid(Vec<GridCell<YearRange>>),
    ScenarioYearRangeGrid(Vec<GridCell<ScenarioPeriod>>),
    MonthlyGrid(Vec<MonthlyCell>),
}

impl GridCells {
    /// Number of cells that resolved to a layer
    pub fn matched(&self) -> usize {
        match self {
            Self::Map(layer) => usize::from(layer.is_some()),
            Self::ScenarioGrid(cells) => cells.iter().filter(|c| c.layer.is_some()).count(),
            Self::YearRangeGrid(cells) => cells.iter().filter(|c| c.layer.is_some()).count(),
            Self::ScenarioYearRangeGrid(cells) => {
                cells.iter().filter(|c| c.layer.is_some()).count()
            }
            Self::MonthlyGrid(cells) => cells.iter().filter(|c| c.layer.is_some()).count(),
        }
    }
}

/// Owns a selection and keeps it consistent with the catalog.
///
/// Every change runs the same sequence: fill in projection defaults, reset
/// facets that are no longer available, then callers read the layer or grid
/// and the URL.
pub struct FacetController {
    catalog: Arc<ClimateCatalog>,
    domains: Arc<FacetDomains>,
    config: FilterConfig,
    defaults: ControllerDefaults,
    page: PageKind,
    selection: FacetSelection,
}

impl FacetController {
    pub fn new(catalog: Arc<ClimateCatalog>, page: PageKind) -> Self {
        let domains = Arc::new(FacetDomains::from_catalog(&catalog));
        Self::with_domains(catalog, domains, page)
    }

    /// Build a controller over precomputed domains
    pub fn with_domains(
        catalog: Arc<ClimateCatalog>,
        domains: Arc<FacetDomains>,
        page: PageKind,
    ) -> Self {
        Self::with_config(
            catalog,
            domains,
            page,
            FilterConfig::default(),
            ControllerDefaults::default(),
        )
    }

    pub fn with_config(
        catalog: Arc<ClimateCatalog>,
        domains: Arc<FacetDomains>,
        page: PageKind,
        config: FilterConfig,
        defaults: ControllerDefaults,
    ) -> Self {
        let mut controller = Self {
            catalog,
            domains,
            config,
            defaults,
            page,
            selection: FacetSelection::default(),
        };
        controller.initialize_default_selections();
        controller.reset_invalid_selections();
        controller
    }

    pub fn page(&self) -> PageKind {
        self.page
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn domains(&self) -> &FacetDomains {
        &self.domains
    }

    fn filter(&self) -> FacetFilter<'_> {
        FacetFilter::with_config(&self.catalog, &self.domains.variables, self.config.clone())
    }

    fn matcher(&self) -> LayerMatcher<'_> {
        LayerMatcher::new(&self.catalog, &self.domains.variables)
    }

    /// Selectable values for the current selection
    pub fn options(&self) -> FacetOptions {
        self.filter().options(&self.domains, &self.selection)
    }

    /// Replace the selection with user input and normalize it
    pub fn on_controls_change(&mut self, selection: FacetSelection) {
        self.selection = selection;
        self.handle_controls_change();
    }

    /// Apply URL parameters; returns whether the selection changed
    pub fn apply_url(&mut self, controls: &UrlControls) -> bool {
        let decoded = decode_controls(controls, &self.domains.year_ranges);
        let changed = decoded.apply_to(&mut self.selection);
        if changed {
            self.handle_controls_change();
        }
        changed
    }

    fn handle_controls_change(&mut self) {
        self.set_default_future_selections();
        self.reset_invalid_selections();
        tracing::debug!(
            "{} selection: {} {:?} {} {:?} {:?} difference={} month={}",
            self.page,
            self.selection.variable,
            self.selection.year_range.as_ref().map(|r| r.label.as_str()),
            self.selection.resolution,
            self.selection.scenario,
            self.selection.model,
            self.selection.show_difference_map,
            self.selection.month
        );
    }

    fn farthest_future<'r>(ranges: impl IntoIterator<Item = &'r YearRange>) -> Option<&'r YearRange> {
        ranges
            .into_iter()
            .filter(|r| !r.is_historical())
            .max_by_key(|r| r.value.end)
    }

    fn initialize_default_selections(&mut self) {
        match self.page {
            PageKind::Map | PageKind::MonthlyGrid => {
                if self.selection.year_range.is_none() {
                    self.selection.year_range = self.domains.year_ranges.first().cloned();
                }
            }
            PageKind::ScenarioGrid => {
                self.selection.year_range = Self::farthest_future(&self.domains.year_ranges)
                    .or(self.domains.year_ranges.first())
                    .cloned();
                self.selection.model = Some(self.defaults.model);
            }
            PageKind::YearRangeGrid => {
                self.selection.scenario = Some(self.defaults.scenario);
                self.selection.model = Some(self.defaults.model);
            }
            PageKind::ScenarioYearRangeGrid => {
                self.selection.model = Some(self.defaults.model);
            }
        }
    }

    fn set_default_future_selections(&mut self) {
        if !self.selection.is_future() {
            return;
        }
        if self.selection.scenario.is_none() && self.page != PageKind::ScenarioGrid {
            self.selection.scenario = Some(self.defaults.scenario);
        }
        if self.selection.model.is_none() {
            self.selection.model = Some(self.defaults.model);
        }
    }

    /// True when `selected` is among `available` by primary value or alias
    pub fn is_year_range_available(selected: &YearRange, available: &[YearRange]) -> bool {
        available.iter().any(|range| {
            range.value == selected.value || selected.additional_values.contains(&range.value)
        })
    }

    /// Move unavailable facets back onto available values.
    ///
    /// The year range is settled first; remaining facets are checked against
    /// options recomputed for the settled year range.
    fn reset_invalid_selections(&mut self) {
        if matches!(self.page, PageKind::Map | PageKind::ScenarioGrid) {
            let available = self.options().year_ranges;
            let valid = self
                .selection
                .year_range
                .as_ref()
                .is_some_and(|r| Self::is_year_range_available(r, &available));
            if !valid {
                self.selection.year_range = match self.page {
                    PageKind::ScenarioGrid => Self::farthest_future(&available),
                    _ => None,
                }
                .or(available.first())
                .cloned();
            }
        } else if self.page == PageKind::MonthlyGrid {
            // Only a year range that is set gets corrected
            let available = self.options().year_ranges;
            if self
                .selection
                .year_range
                .as_ref()
                .is_some_and(|r| !Self::is_year_range_available(r, &available))
            {
                self.selection.year_range = available.first().cloned();
            }
        }

        let options = self.options();
        let future = self.selection.is_future();

        if !options.resolutions.contains(&self.selection.resolution) {
            self.selection.resolution = options
                .resolutions
                .first()
                .copied()
                .unwrap_or(self.defaults.resolution);
        }

        match self.page {
            PageKind::Map => {
                if future {
                    if !self.selection.scenario.is_some_and(|s| options.scenarios.contains(&s)) {
                        self.selection.scenario = options.scenarios.first().copied();
                    }
                    // Models depend on the scenario just settled
                    let models = self.options().models;
                    if !self.selection.model.is_some_and(|m| models.contains(&m)) {
                        self.selection.model = models.first().copied();
                    }
                }
            }
            PageKind::ScenarioGrid => {
                if future && !self.selection.model.is_some_and(|m| options.models.contains(&m)) {
                    self.selection.model = options.models.first().copied();
                }
            }
            PageKind::YearRangeGrid => {
                if !self.selection.scenario.is_some_and(|s| options.scenarios.contains(&s)) {
                    self.selection.scenario =
                        Some(options.scenarios.first().copied().unwrap_or(self.defaults.scenario));
                }
                let models = self.options().models;
                if !self.selection.model.is_some_and(|m| models.contains(&m)) {
                    self.selection.model =
                        Some(models.first().copied().unwrap_or(self.defaults.model));
                }
            }
            PageKind::ScenarioYearRangeGrid => {
                if !self.selection.model.is_some_and(|m| options.models.contains(&m)) {
                    self.selection.model =
                        Some(options.models.first().copied().unwrap_or(self.defaults.model));
                }
            }
            PageKind::MonthlyGrid => {
                if future {
                    if self.selection.scenario.is_some_and(|s| !options.scenarios.contains(&s)) {
                        self.selection.scenario = options.scenarios.first().copied();
                    }
                    let models = self.options().models;
                    if self.selection.model.is_some_and(|m| !models.contains(&m)) {
                        self.selection.model = models.first().copied();
                    }
                }
            }
        }
    }

    /// The single layer for the current selection
    pub fn current_layer(&self) -> Option<LayerOption> {
        self.matcher().find_layer(&self.selection)
    }

    /// Cells for the page's grid; a single map yields its one layer
    pub fn grid(&self) -> GridCells {
        let matcher = self.matcher();
        match self.page {
            PageKind::Map => GridCells::Map(matcher.find_layer(&self.selection)),
            PageKind::ScenarioGrid => {
                let scenarios = self.options().scenarios;
                GridCells::ScenarioGrid(matcher.scenario_cells(&self.selection, &scenarios))
            }
            PageKind::YearRangeGrid => {
                let year_ranges = self.options().year_ranges;
                GridCells::YearRangeGrid(matcher.year_range_cells(&self.selection, &year_ranges))
            }
            PageKind::ScenarioYearRangeGrid => {
                let year_ranges = self.options().year_ranges;
                GridCells::ScenarioYearRangeGrid(matcher.scenario_year_range_cells(
                    &self.selection,
                    &self.domains.scenarios,
                    &year_ranges,
                ))
            }
            PageKind::MonthlyGrid => GridCells::MonthlyGrid(matcher.monthly_cells(&self.selection)),
        }
    }

    /// URL parameters for the page, leaving out facets the page implies
    pub fn url_controls(&self) -> UrlControls {
        let mut selection = self.selection.clone();
        let historical = selection.is_historical();
        match self.page {
            PageKind::Map | PageKind::MonthlyGrid => {
                if historical {
                    selection.scenario = None;
                    selection.model = None;
                }
            }
            PageKind::ScenarioGrid => {
                selection.scenario = None;
                if historical {
                    selection.model = None;
                }
            }
            PageKind::YearRangeGrid => {}
            PageKind::ScenarioYearRangeGrid => {
                selection.scenario = None;
                selection.year_range = None;
            }
        }
        encode_controls(&selection)
    }

    /// The URL that should replace `url` for the current selection
    pub fn sync_url(&self, url: &Url) -> Url {
        update_url_params(url, &self.url_controls())
    }
}
