use clap::Args;

use crate::api::{ClimateApiClient, DEFAULT_API_URL, DEFAULT_GEOCODE_LIMIT};
use crate::cli::OutputFormat;
use crate::url_state::MapView;

#[derive(Args)]
pub struct GeocodeArgs {
    /// Place name to search for
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of suggestions
    #[arg(long, default_value_t = DEFAULT_GEOCODE_LIMIT)]
    pub limit: usize,
}

pub fn run(args: GeocodeArgs, api_url: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    let client = ClimateApiClient::new(api_url.unwrap_or(DEFAULT_API_URL))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let locations = runtime.block_on(client.geocode(&args.query, args.limit))?;

    match format {
        OutputFormat::Text => {
            if locations.is_empty() {
                println!("No places found for '{}'", args.query);
            }
            for location in &locations {
                println!(
                    "{} [{}] {:.4}, {:.4} (zoom {})",
                    location.display_name,
                    location.kind,
                    location.latitude,
                    location.longitude,
                    location.zoom_level()
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = locations
                .iter()
                .map(|location| {
                    let view = MapView {
                        lat: location.latitude,
                        lon: location.longitude,
                        zoom: f64::from(location.zoom_level()),
                    };
                    serde_json::json!({
                        "location": location,
                        "view": view,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("display_name\ttype\tlatitude\tlongitude\tzoom");
            for location in &locations {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    location.display_name,
                    location.kind,
                    location.latitude,
                    location.longitude,
                    location.zoom_level()
                );
            }
        }
    }

    Ok(())
}
