use std::path::Path;

use clap::Args;

use crate::api::{ClimateApiClient, DEFAULT_API_URL};
use crate::cli::{controller_for_query, OutputFormat};
use crate::facets::controller::PageKind;
use crate::units::{
    convert_value, normalize_unit, PrecipitationUnit, TemperatureUnit, UnitPreferences,
};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum UnitsArg {
    /// Pick from the LANG environment variable
    #[default]
    Auto,
    Metric,
    Imperial,
}

impl UnitsArg {
    fn preferences(self) -> UnitPreferences {
        match self {
            Self::Metric => UnitPreferences::default(),
            Self::Imperial => UnitPreferences {
                temperature: TemperatureUnit::Fahrenheit,
                precipitation: PrecipitationUnit::Inches,
            },
            Self::Auto => std::env::var("LANG")
                .ok()
                .and_then(|lang| lang.split('.').next().map(str::to_string))
                .map(|locale| UnitPreferences::for_locale(&locale))
                .unwrap_or_default(),
        }
    }
}

#[derive(Args)]
pub struct ValueArgs {
    /// URL query string or full URL selecting the layer
    pub query: String,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Units to report the value in
    #[arg(long, value_enum, default_value_t = UnitsArg::Auto)]
    pub units: UnitsArg,
}

pub fn run(
    args: ValueArgs,
    catalog_path: Option<&Path>,
    api_url: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let controller =
        controller_for_query(&args.query, PageKind::Map, catalog_path, api_url, verbose)?;
    let selection = controller.selection();
    let layer = controller
        .current_layer()
        .ok_or_else(|| anyhow::anyhow!("No layer matches this selection"))?;

    let client = ClimateApiClient::new(api_url.unwrap_or(DEFAULT_API_URL))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let data_type = layer.entry.data_type.as_str();
    let (point, city) = runtime.block_on(async {
        let point = client
            .point_value(data_type, selection.month, args.lat, args.lon)
            .await;
        let city = client.nearest_city(args.lat, args.lon).await;
        (point, city)
    });
    let point = point?;
    let city = match city {
        Ok(city) => Some(city),
        Err(e) => {
            tracing::debug!("No nearest city: {}", e);
            None
        }
    };

    let prefs = args.units.preferences();
    let unit = normalize_unit(
        point.unit.as_deref().unwrap_or(&layer.entry.variable.unit),
        selection.variable,
    );
    let converted = point
        .value
        .map(|v| convert_value(v, &unit, selection.variable, prefs));

    match format {
        OutputFormat::Text => {
            println!("Layer:    {}", layer.name);
            println!("Month:    {}", selection.month);
            match &city {
                Some(city) => println!(
                    "Location: {:.4}, {:.4} (near {})",
                    args.lat, args.lon, city.name
                ),
                None => println!("Location: {:.4}, {:.4}", args.lat, args.lon),
            }
            match &converted {
                Some((value, unit)) => println!("Value:    {value:.1} {unit}"),
                None => println!("Value:    no data"),
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "data_type": data_type,
                "month": selection.month,
                "lat": args.lat,
                "lon": args.lon,
                "value": converted.as_ref().map(|(v, _)| v),
                "unit": converted.as_ref().map_or(unit.as_str(), |(_, u)| u.as_str()),
                "nearest_city": city,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("data_type\tmonth\tlat\tlon\tvalue\tunit");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                data_type,
                selection.month,
                args.lat,
                args.lon,
                converted
                    .as_ref()
                    .map(|(v, _)| v.to_string())
                    .unwrap_or_default(),
                converted.as_ref().map_or(unit.as_str(), |(_, u)| u.as_str())
            );
        }
    }

    Ok(())
}
