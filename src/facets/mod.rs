//! Facet availability and selection state.
//!
//! - [`FacetFilter`]: Which values of each facet remain selectable given the
//!   other selections
//! - [`FacetController`]: Owns a [`FacetSelection`](crate::core::selection::FacetSelection)
//!   and applies the per-page default and reset rules after every change
//! - [`order_by_priority`]: Canonical ordering shared by every facet list

pub mod controller;
pub mod filter;
pub mod ordering;

pub use controller::{ControllerDefaults, FacetController, GridCells, PageKind};
pub use filter::{DifferenceRule, FacetFilter, FacetOptions, FilterConfig};
pub use ordering::order_by_priority;
