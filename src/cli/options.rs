use std::path::Path;

use clap::Args;

use crate::cli::{controller_for_query, OutputFormat};
use crate::core::selection::FacetSelection;
use crate::facets::controller::PageKind;
use crate::facets::filter::FacetOptions;

#[derive(Args)]
pub struct OptionsArgs {
    /// URL query string or full URL (e.g. "variable=T_MAX&yearRange=2041-2060")
    #[arg(default_value = "")]
    pub query: String,

    /// Page whose defaults and reset rules apply
    #[arg(long, default_value = "map")]
    pub page: PageKind,
}

pub fn run(
    args: OptionsArgs,
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let controller = controller_for_query(&args.query, args.page, catalog_path, api_url, verbose)?;
    let selection = controller.selection();
    let options = controller.options();

    match format {
        OutputFormat::Text => print_text(selection, &options),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "page": controller.page(),
                "selection": selection,
                "options": options,
                "query": controller.url_controls().to_query_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("facet\tvalue\tselected");
            for v in &options.variables {
                println!("variable\t{v}\t{}", *v == selection.variable);
            }
            for r in &options.year_ranges {
                println!(
                    "yearRange\t{}\t{}",
                    r.value,
                    selection.year_range.as_ref() == Some(r)
                );
            }
            for r in &options.resolutions {
                println!("resolution\t{r}\t{}", *r == selection.resolution);
            }
            for s in &options.scenarios {
                println!("scenario\t{s}\t{}", selection.scenario == Some(*s));
            }
            for m in &options.models {
                println!("model\t{m}\t{}", selection.model == Some(*m));
            }
        }
    }

    Ok(())
}

fn print_text(selection: &FacetSelection, options: &FacetOptions) {
    fn row<T: PartialEq>(
        label: &str,
        values: &[T],
        selected: Option<&T>,
        show: impl Fn(&T) -> String,
    ) {
        let cells: Vec<String> = values
            .iter()
            .map(|v| {
                if selected == Some(v) {
                    format!("[{}]", show(v))
                } else {
                    show(v)
                }
            })
            .collect();
        let cells = if cells.is_empty() {
            "-".to_string()
        } else {
            cells.join("  ")
        };
        println!("{label:<12} {cells}");
    }

    row("Variable", &options.variables, Some(&selection.variable), |v| {
        v.to_string()
    });
    row(
        "Year range",
        &options.year_ranges,
        selection.year_range.as_ref(),
        |r| r.label.clone(),
    );
    row(
        "Resolution",
        &options.resolutions,
        Some(&selection.resolution),
        |r| r.to_string(),
    );
    row(
        "Scenario",
        &options.scenarios,
        selection.scenario.as_ref(),
        |s| s.to_string(),
    );
    row("Model", &options.models, selection.model.as_ref(), |m| {
        m.to_string()
    });
    println!("{:<12} {}", "Difference", selection.show_difference_map);
    println!("{:<12} {}", "Month", selection.month);
}
