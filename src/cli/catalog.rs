use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::catalog::metadata::FacetDomains;
use crate::catalog::store::ClimateCatalog;
use crate::cli::{load_catalog, OutputFormat};
use crate::core::types::{ClimateScenario, ClimateVarKey};
use crate::core::year_range::YearSpan;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all layers in the catalog
    List {
        /// Filter by variable (e.g., "T_MAX")
        #[arg(long)]
        variable: Option<ClimateVarKey>,

        /// Filter by scenario (e.g., "SSP370")
        #[arg(long)]
        scenario: Option<ClimateScenario>,

        /// Filter by year range (e.g., "2081-2100")
        #[arg(long)]
        year_range: Option<YearSpan>,
    },

    /// Show details of a specific layer
    Show {
        /// Layer data type
        #[arg(required = true)]
        data_type: String,
    },

    /// Show the ordered domain of every facet
    Domains,

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },
}

pub fn run(
    args: CatalogArgs,
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path, api_url, verbose)?;

    match args.command {
        CatalogCommands::List {
            variable,
            scenario,
            year_range,
        } => run_list(&catalog, variable, scenario, year_range, format, verbose),
        CatalogCommands::Show { data_type } => run_show(&catalog, &data_type, format),
        CatalogCommands::Domains => run_domains(&catalog, format),
        CatalogCommands::Export { output } => run_export(&catalog, &output),
    }
}

fn run_list(
    catalog: &ClimateCatalog,
    variable: Option<ClimateVarKey>,
    scenario: Option<ClimateScenario>,
    year_range: Option<YearSpan>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let domains = FacetDomains::from_catalog(catalog);
    let variable_name = variable.and_then(|key| domains.variables.name_of(key));
    if variable.is_some() && variable_name.is_none() {
        anyhow::bail!(
            "Variable '{}' has no layers in this catalog",
            variable.map(ClimateVarKey::as_str).unwrap_or_default()
        );
    }

    let filtered: Vec<_> = catalog
        .entries
        .iter()
        .filter(|e| variable_name.map_or(true, |name| e.variable.name == name))
        .filter(|e| scenario.map_or(true, |s| e.scenario() == Some(s)))
        .filter(|e| year_range.map_or(true, |span| e.year_range == span))
        .collect();

    match format {
        OutputFormat::Text => {
            let dt_width = filtered
                .iter()
                .map(|e| e.data_type.len())
                .max()
                .unwrap_or(9)
                .max(9);
            let var_width = filtered
                .iter()
                .map(|e| e.variable.name.len())
                .max()
                .unwrap_or(8)
                .max(8);

            let total_width = dt_width + var_width + 9 + 10 + 7 + 18 + 4 + 6;

            println!("Climate Map Catalog ({} layers)\n", filtered.len());
            println!(
                "{:<dt_w$} {:<var_w$} {:<9} {:<10} {:<7} {:<18} {:>4}",
                "Data type",
                "Variable",
                "Years",
                "Resolution",
                "Scen.",
                "Model",
                "Diff",
                dt_w = dt_width,
                var_w = var_width,
            );
            println!("{}", "-".repeat(total_width));

            for e in &filtered {
                println!(
                    "{:<dt_w$} {:<var_w$} {:<9} {:<10} {:<7} {:<18} {:>4}",
                    e.data_type,
                    e.variable.name,
                    e.year_range.to_string(),
                    e.resolution.as_str(),
                    e.scenario().map(ClimateScenario::as_str).unwrap_or("-"),
                    e.model().map(|m| m.as_str()).unwrap_or("-"),
                    if e.is_difference_map { "yes" } else { "" },
                    dt_w = dt_width,
                    var_w = var_width,
                );
                if verbose {
                    println!("  └─ tiles: {}  colormap: {}", e.tiles_url_base, e.colormap_url);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("data_type\tvariable\tyear_range\tresolution\tscenario\tmodel\tis_difference_map");
            for e in &filtered {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    e.data_type,
                    e.variable.name,
                    e.year_range,
                    e.resolution,
                    e.scenario().map(ClimateScenario::as_str).unwrap_or(""),
                    e.model().map(|m| m.as_str()).unwrap_or(""),
                    e.is_difference_map
                );
            }
        }
    }

    Ok(())
}

fn run_show(catalog: &ClimateCatalog, data_type: &str, format: OutputFormat) -> anyhow::Result<()> {
    let entry = catalog
        .get(data_type)
        .ok_or_else(|| anyhow::anyhow!("Layer '{}' not found", data_type))?;

    match format {
        OutputFormat::Text => {
            println!("Layer: {}\n", entry.data_type);
            println!(
                "Variable:   {} ({}, {})",
                entry.variable.display_name, entry.variable.name, entry.variable.unit
            );
            println!("Years:      {}", entry.year_range);
            println!("Resolution: {} ({})", entry.resolution, entry.resolution.label());
            match (entry.scenario(), entry.model()) {
                (Some(scenario), Some(model)) => {
                    println!("Scenario:   {} ({})", scenario, scenario.display_name());
                    println!("Model:      {model}");
                }
                _ => println!("Kind:       historical"),
            }
            println!("Difference: {}", entry.is_difference_map);
            println!("\nTiles:      {}", entry.tiles_url_base);
            println!("Colormap:   {}", entry.colormap_url);
            println!(
                "Max zoom:   raster {}, vector {}",
                entry.max_zoom_raster, entry.max_zoom_vector
            );

            if let Some(source) = &entry.source {
                println!("\nSource: {source}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Tsv => {
            println!("field\tvalue");
            println!("data_type\t{}", entry.data_type);
            println!("variable\t{}", entry.variable.name);
            println!("year_range\t{}", entry.year_range);
            println!("resolution\t{}", entry.resolution);
            println!(
                "scenario\t{}",
                entry.scenario().map(ClimateScenario::as_str).unwrap_or("")
            );
            println!("model\t{}", entry.model().map(|m| m.as_str()).unwrap_or(""));
            println!("is_difference_map\t{}", entry.is_difference_map);
            println!("tiles_url\t{}", entry.tiles_url_base);
        }
    }

    Ok(())
}

fn run_domains(catalog: &ClimateCatalog, format: OutputFormat) -> anyhow::Result<()> {
    let domains = FacetDomains::from_catalog(catalog);

    match format {
        OutputFormat::Text => {
            let join = |values: Vec<&str>| values.join(", ");
            println!(
                "Variables:   {}",
                join(domains.variable_keys.iter().map(|k| k.as_str()).collect())
            );
            println!(
                "Year ranges: {}",
                join(domains.year_ranges.iter().map(|r| r.label.as_str()).collect())
            );
            println!(
                "Resolutions: {}",
                join(domains.resolutions.iter().map(|r| r.as_str()).collect())
            );
            println!(
                "Scenarios:   {}",
                join(domains.scenarios.iter().map(|s| s.as_str()).collect())
            );
            println!(
                "Models:      {}",
                join(domains.models.iter().map(|m| m.as_str()).collect())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&domains)?);
        }
        OutputFormat::Tsv => {
            println!("facet\tvalue");
            for k in &domains.variable_keys {
                println!("variable\t{k}");
            }
            for r in &domains.year_ranges {
                println!("yearRange\t{}", r.value);
            }
            for r in &domains.resolutions {
                println!("resolution\t{r}");
            }
            for s in &domains.scenarios {
                println!("scenario\t{s}");
            }
            for m in &domains.models {
                println!("model\t{m}");
            }
        }
    }

    Ok(())
}

fn run_export(catalog: &ClimateCatalog, output: &Path) -> anyhow::Result<()> {
    let json = catalog.to_json()?;
    std::fs::write(output, json)?;

    println!("Exported {} layers to {}", catalog.len(), output.display());

    Ok(())
}
