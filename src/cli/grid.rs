use std::path::Path;

use clap::Args;

use crate::cli::{controller_for_query, OutputFormat};
use crate::core::types::Month;
use crate::facets::controller::{GridCells, PageKind};
use crate::matching::layer::LayerOption;

#[derive(Args)]
pub struct GridArgs {
    /// URL query string or full URL
    #[arg(default_value = "")]
    pub query: String,

    /// Grid page to resolve
    #[arg(long, required = true)]
    pub page: PageKind,
}

/// One printed grid cell; `month` selects the tiles shown for it
struct Row<'a> {
    label: String,
    layer: Option<&'a LayerOption>,
    month: Month,
}

impl<'a> Row<'a> {
    fn new(label: String, layer: &'a Option<LayerOption>, month: Month) -> Self {
        Self {
            label,
            layer: layer.as_ref(),
            month,
        }
    }
}

/// Flatten a grid into rows; cells without a month of their own use `month`
fn rows(grid: &GridCells, month: Month) -> Vec<Row<'_>> {
    match grid {
        GridCells::Map(layer) => vec![Row::new("map".to_string(), layer, month)],
        GridCells::ScenarioGrid(cells) => cells
            .iter()
            .map(|c| Row::new(c.key.to_string(), &c.layer, month))
            .collect(),
        GridCells::YearRangeGrid(cells) => cells
            .iter()
            .map(|c| Row::new(c.key.label.clone(), &c.layer, month))
            .collect(),
        GridCells::ScenarioYearRangeGrid(cells) => cells
            .iter()
            .map(|c| {
                Row::new(
                    format!("{} {}", c.key.scenario, c.key.year_range.label),
                    &c.layer,
                    month,
                )
            })
            .collect(),
        GridCells::MonthlyGrid(cells) => cells
            .iter()
            .map(|c| Row::new(c.label.to_string(), &c.layer, c.month))
            .collect(),
    }
}

pub fn run(
    args: GridArgs,
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let controller = controller_for_query(&args.query, args.page, catalog_path, api_url, verbose)?;
    let grid = controller.grid();

    match format {
        OutputFormat::Text => {
            let rows = rows(&grid, controller.selection().month);
            let label_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(4).max(4);

            println!(
                "{} ({} of {} cells matched)\n",
                controller.page(),
                grid.matched(),
                rows.len()
            );
            println!("{:<w$} Layer", "Cell", w = label_width);
            println!("{}", "-".repeat(label_width + 50));
            for row in &rows {
                let data_type = row.layer.map_or("-", |l| l.entry.data_type.as_str());
                println!("{:<w$} {data_type}", row.label, w = label_width);
                if verbose {
                    if let Some(layer) = row.layer {
                        println!("  └─ {}", layer.raster_template(row.month));
                    }
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "selection": controller.selection(),
                "query": controller.url_controls().to_query_string(),
                "grid": grid,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("cell\tdata_type");
            for row in rows(&grid, controller.selection().month) {
                println!(
                    "{}\t{}",
                    row.label,
                    row.layer.map_or("", |l| l.entry.data_type.as_str())
                );
            }
        }
    }

    Ok(())
}
