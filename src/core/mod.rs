//! Core data types for climate layer selection.
//!
//! - [`CatalogEntry`](entry::CatalogEntry): one pre-rendered layer advertised by the backend
//! - [`LayerKind`](entry::LayerKind): historical observations vs. CMIP6 projections
//! - [`FacetSelection`](selection::FacetSelection): the user's choice for every facet
//! - [`YearRange`](year_range::YearRange): a year-range facet value, possibly with aliases
//! - [`ClimateVarKey`], [`SpatialResolution`], [`ClimateScenario`], [`ClimateModel`],
//!   [`Month`]: closed facet domains
//!
//! ## Historical vs. projected
//!
//! A year span starting before 2000 is historical. Historical entries never
//! carry a scenario or model, which [`LayerKind`](entry::LayerKind) makes
//! unrepresentable.
//!
//! [`ClimateVarKey`]: types::ClimateVarKey
//! [`SpatialResolution`]: types::SpatialResolution
//! [`ClimateScenario`]: types::ClimateScenario
//! [`ClimateModel`]: types::ClimateModel
//! [`Month`]: types::Month

pub mod entry;
pub mod selection;
pub mod types;
pub mod year_range;
