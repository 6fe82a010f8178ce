//! # climate-facets
//!
//! A library for resolving climate map facet selections to pre-rendered tile layers.
//!
//! A climate map viewer offers a handful of facets: variable, year range,
//! spatial resolution, emission scenario, climate model, difference mode and
//! month. Only some combinations were ever rendered, and the backend lists
//! those in a flat catalog.
//!
//! `climate-facets` answers the questions a viewer keeps asking of that catalog:
//! which values of each facet still lead somewhere, which layer the current
//! selection shows, and how the selection round-trips through a shareable URL.
//!
//! ## Features
//!
//! - **Facet narrowing**: Each facet is offered only with values that match a layer
//! - **Exact matching**: The first catalog entry satisfying every facet wins
//! - **Baseline merge**: 1961-1990 and 1970-2000 are presented as one option
//! - **Page rules**: Defaults and auto-correction for the map and grid pages
//! - **URL state**: Lenient decoding and in-place updates of query parameters
//! - **Backend client**: Catalog, point values, geocoding and legends
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use climate_facets::{ClimateCatalog, FacetController, PageKind, UrlControls};
//!
//! let catalog = Arc::new(ClimateCatalog::load_embedded().unwrap());
//! let mut controller = FacetController::new(catalog, PageKind::Map);
//!
//! controller.apply_url(&UrlControls::from_query(
//!     "variable=T_MAX&yearRange=2081-2100&scenario=SSP370&difference=true",
//! ));
//!
//! if let Some(layer) = controller.current_layer() {
//!     println!("{}: {}", layer.name, layer.entry.data_type);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Layer catalog storage and facet domains
//! - [`core`]: Core data types for entries, facets and selections
//! - [`facets`]: Facet availability and the selection controller
//! - [`matching`]: Layer matching and grid cells
//! - [`url_state`]: URL parameter encoding and decoding
//! - [`units`]: Display unit preferences and conversion
//! - [`api`]: Client for the backend API
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: JSON HTTP API

pub mod api;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod facets;
pub mod matching;
pub mod units;
pub mod url_state;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use api::{ApiError, ClimateApiClient};
pub use catalog::metadata::{FacetDomains, VariableRegistry};
pub use catalog::store::{CatalogError, ClimateCatalog};
pub use crate::core::entry::{CatalogEntry, ClimateVariable, LayerKind};
pub use crate::core::selection::FacetSelection;
pub use crate::core::types::*;
pub use crate::core::year_range::{YearRange, YearSpan};
pub use facets::{FacetController, FacetFilter, FacetOptions, FilterConfig, GridCells, PageKind};
pub use matching::engine::{FacetOverride, GridCell, LayerMatcher};
pub use matching::layer::LayerOption;
pub use url_state::UrlControls;
