//! Layer matching: from a facet selection to one renderable layer.
//!
//! - [`LayerMatcher`]: Walks the catalog in backend order and returns the
//!   first entry satisfying every selected facet
//! - [`LayerOption`]: Display name and tile URL templates for an entry
//! - [`GridCell`]: One cell of a scenario or year-range comparison grid
//!
//! ## Matching Algorithm
//!
//! Each entry is checked with a short-circuiting predicate:
//!
//! 1. **Variable**: catalog name equals the configured name of the selected variable
//! 2. **Year range**: entry range equals the primary value or any alias
//! 3. **Resolution**: exact match
//! 4. **Kind**: a historical selection needs a historical, absolute entry; a
//!    projected selection needs matching difference state, plus matching
//!    scenario and model when those are set
//!
//! Grid views reuse the same predicate with a [`FacetOverride`] substituting
//! the year range or scenario of each cell.
//!
//! ## Example
//!
//! ```rust,no_run
//! use climate_facets::{ClimateCatalog, FacetDomains, FacetSelection, LayerMatcher};
//!
//! let catalog = ClimateCatalog::load_embedded().unwrap();
//! let domains = FacetDomains::from_catalog(&catalog);
//!
//! let mut selection = FacetSelection::default();
//! selection.year_range = domains.year_ranges.first().cloned();
//!
//! let matcher = LayerMatcher::new(&catalog, &domains.variables);
//! if let Some(layer) = matcher.find_layer(&selection) {
//!     println!("{}: {}", layer.name, layer.raster_template(selection.month));
//! }
//! ```

pub mod engine;
pub mod layer;

pub use engine::{FacetOverride, GridCell, LayerMatcher, MonthlyCell, ScenarioPeriod};
pub use layer::{LayerOption, TileCoord};
