use std::path::Path;

use clap::Args;

use crate::cli::{controller_for_query, OutputFormat};
use crate::facets::controller::PageKind;

#[derive(Args)]
pub struct ResolveArgs {
    /// URL query string or full URL (e.g. "variable=T_MAX&yearRange=2081-2100")
    #[arg(default_value = "")]
    pub query: String,

    /// Page whose defaults and reset rules apply
    #[arg(long, default_value = "map")]
    pub page: PageKind,
}

pub fn run(
    args: ResolveArgs,
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let controller = controller_for_query(&args.query, args.page, catalog_path, api_url, verbose)?;
    let selection = controller.selection();
    let layer = controller.current_layer();
    let query = controller.url_controls().to_query_string();

    match format {
        OutputFormat::Text => {
            println!("Query: {query}\n");
            match &layer {
                Some(layer) => {
                    println!("Layer:     {}", layer.name);
                    println!("Data type: {}", layer.entry.data_type);
                    println!("Raster:    {}", layer.raster_template(selection.month));
                    println!("Vector:    {}", layer.vector_template(selection.month));
                    println!(
                        "Max zoom:  raster {}, vector {}",
                        layer.raster_max_zoom, layer.vector_max_zoom
                    );
                    if verbose {
                        println!("Colormap:  {}", layer.entry.colormap_url);
                    }
                }
                None => {
                    println!("No layer matches this selection.");
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "selection": selection,
                "query": query,
                "layer": layer,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("data_type\tname\traster_template\tvector_template");
            if let Some(layer) = &layer {
                println!(
                    "{}\t{}\t{}\t{}",
                    layer.entry.data_type,
                    layer.name,
                    layer.raster_template(selection.month),
                    layer.vector_template(selection.month)
                );
            }
        }
    }

    Ok(())
}
