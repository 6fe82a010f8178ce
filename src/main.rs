use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod catalog;
mod cli;
mod core;
mod facets;
mod matching;
mod units;
mod url_state;
mod utils;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("climate_facets=debug,info")
    } else {
        EnvFilter::new("climate_facets=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let catalog_path = cli.catalog.as_deref();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, catalog_path, api_url, cli.format, cli.verbose)?;
        }
        cli::Commands::Options(args) => {
            cli::options::run(args, catalog_path, api_url, cli.format, cli.verbose)?;
        }
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, catalog_path, api_url, cli.format, cli.verbose)?;
        }
        cli::Commands::Grid(args) => {
            cli::grid::run(args, catalog_path, api_url, cli.format, cli.verbose)?;
        }
        cli::Commands::Value(args) => {
            cli::value::run(args, catalog_path, api_url, cli.format, cli.verbose)?;
        }
        cli::Commands::Geocode(args) => {
            cli::geocode::run(args, api_url, cli.format)?;
        }
        cli::Commands::Serve(args) => {
            let catalog = cli::load_catalog(catalog_path, api_url, cli.verbose)?;
            web::server::run(args, catalog)?;
        }
    }

    Ok(())
}
