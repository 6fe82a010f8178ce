//! Command-line interface for climate-facets.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **catalog**: List, show, or export layers from the catalog
//! - **options**: Show which facet values are selectable for a URL query
//! - **resolve**: Resolve a URL query to a single tile layer
//! - **grid**: Resolve every cell of a grid page
//! - **value**: Look up a layer's value at a coordinate from the backend
//! - **geocode**: Search the backend for places
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Which layer does a shared link show?
//! climate-facets resolve "variable=T_MAX&yearRange=2081-2100&scenario=SSP370"
//!
//! # Options against a live backend
//! climate-facets --api-url http://localhost:8000 options "variable=PRECIPITATION"
//!
//! # One map per scenario, as JSON
//! climate-facets grid "yearRange=2041-2060" --page scenario-grid --format json
//!
//! # July maximum temperature at a point, in local units
//! climate-facets value "variable=T_MAX&month=7" --lat 52.37 --lon 4.89
//!
//! # Start the HTTP API
//! climate-facets serve --port 8080
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::ClimateApiClient;
use crate::catalog::store::ClimateCatalog;
use crate::facets::controller::{FacetController, PageKind};
use crate::url_state::UrlControls;

pub mod catalog;
pub mod geocode;
pub mod grid;
pub mod options;
pub mod resolve;
pub mod value;

#[derive(Parser)]
#[command(name = "climate-facets")]
#[command(author = "Climate Maps")]
#[command(version)]
#[command(about = "Resolve climate map facet selections to tile layers")]
#[command(
    long_about = "climate-facets works out which pre-rendered climate layer a set of facet choices refers to.\n\nGiven the layer catalog (embedded, from a file, or fetched from the backend) it:\n- Narrows each facet to the values that still lead to a layer\n- Corrects selections that no longer match anything\n- Resolves single maps and grid pages from shareable URL parameters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to a catalog JSON file (overrides --api-url)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Backend to fetch the catalog from; the embedded catalog is used when unset
    #[arg(long, global = true, env = "CLIMATEMAPS_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the layer catalog
    Catalog(catalog::CatalogArgs),

    /// Show selectable facet values for a query
    Options(options::OptionsArgs),

    /// Resolve a query to a single layer
    Resolve(resolve::ResolveArgs),

    /// Resolve every cell of a grid page
    Grid(grid::GridArgs),

    /// Look up the value of the selected layer at a coordinate
    Value(value::ValueArgs),

    /// Search for places
    Geocode(geocode::GeocodeArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the catalog from a file, the backend, or the embedded sample.
///
/// A file that cannot be read is an error. A backend that cannot be reached
/// is reported once and an empty catalog is returned, so every query simply
/// has no options and no layer.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed, or the
/// async runtime cannot be started.
pub fn load_catalog(
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    verbose: bool,
) -> anyhow::Result<ClimateCatalog> {
    let catalog = if let Some(path) = catalog_path {
        ClimateCatalog::load_from_file(path)?
    } else if let Some(api_url) = api_url {
        fetch_catalog(api_url)?
    } else {
        ClimateCatalog::load_embedded()?
    };

    if verbose {
        eprintln!("Loaded catalog with {} layers", catalog.len());
    }

    Ok(catalog)
}

fn fetch_catalog(api_url: &str) -> anyhow::Result<ClimateCatalog> {
    let client = ClimateApiClient::new(api_url)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(client.fetch_catalog()) {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            tracing::warn!("Could not fetch catalog from {}: {}", api_url, e);
            eprintln!("Warning: could not fetch catalog from {api_url}: {e}");
            Ok(ClimateCatalog::new())
        }
    }
}

/// Read control parameters from a bare query string or a full URL
pub fn parse_controls(input: &str) -> UrlControls {
    match reqwest::Url::parse(input) {
        Ok(url) if !url.cannot_be_a_base() => UrlControls::from_url(&url),
        _ => UrlControls::from_query(input),
    }
}

/// Load the catalog and bring a controller for `page` to the state a URL describes
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn controller_for_query(
    query: &str,
    page: PageKind,
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    verbose: bool,
) -> anyhow::Result<FacetController> {
    let catalog = Arc::new(load_catalog(catalog_path, api_url, verbose)?);
    let mut controller = FacetController::new(catalog, page);
    let changed = controller.apply_url(&parse_controls(query));
    if verbose && !changed {
        eprintln!("Query left the {page} defaults unchanged");
    }
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_controls_accepts_query_and_url() {
        let from_query = parse_controls("?variable=PRECIPITATION&month=7");
        assert_eq!(from_query.variable.as_deref(), Some("PRECIPITATION"));
        assert_eq!(from_query.month.as_deref(), Some("7"));

        let from_url = parse_controls("https://climatemaps.example/?variable=T_MIN&lat=52.1");
        assert_eq!(from_url.variable.as_deref(), Some("T_MIN"));
        assert_eq!(from_url.month, None);
    }

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = load_catalog(None, None, false).unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_unreachable_backend_gives_empty_catalog() {
        let catalog = load_catalog(None, Some("http://127.0.0.1:9"), false).unwrap();
        assert!(catalog.is_empty());
    }
}
