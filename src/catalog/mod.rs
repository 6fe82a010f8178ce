//! Layer catalog storage and facet domains.
//!
//! The catalog is the list of pre-rendered layers advertised by the backend
//! at `GET /climatemap`. A sample catalog is compiled into the binary; other
//! catalogs can be loaded from JSON files or fetched live.
//!
//! - [`store::ClimateCatalog`]: entries in backend order with a lookup index
//! - [`metadata::FacetDomains`]: the ordered values of every facet, including
//!   the merged historical year range
//!
//! ## Example
//!
//! ```rust,no_run
//! use climate_facets::{ClimateCatalog, FacetDomains};
//!
//! let catalog = ClimateCatalog::load_embedded().unwrap();
//! let domains = FacetDomains::from_catalog(&catalog);
//!
//! for range in &domains.year_ranges {
//!     println!("{}", range.label);
//! }
//!
//! let entry = catalog.get("tmax_1970_2000_10m");
//! ```
//!
//! ## Custom Catalogs
//!
//! ```rust,no_run
//! use climate_facets::ClimateCatalog;
//! use std::path::Path;
//!
//! let catalog = ClimateCatalog::load_embedded().unwrap();
//! let json = catalog.to_json().unwrap();
//!
//! let custom = ClimateCatalog::load_from_file(Path::new("my_catalog.json")).unwrap();
//! ```

pub mod metadata;
pub mod store;
