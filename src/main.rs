//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ipgeobase` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;

use ipgeobase::config::{Command, Opt};
use ipgeobase::initialization::{init_client, init_logger};
use ipgeobase::{
    init_db_pool_with_path, load_dataset, run_migrations, Ingestor, Mode, RemoteClient, Resolver,
    SharedDataset,
};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger(opt.log_level.clone().into()).context("Failed to initialize logger")?;

    let pool = init_db_pool_with_path(&opt.db_path)
        .await
        .context("Failed to open the database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let generation = load_dataset(&pool)
        .await
        .context("Failed to load the persisted dataset")?;
    let dataset = SharedDataset::new(generation);

    match opt.command {
        Command::Update {
            archive_url,
            batch_rows,
        } => {
            let ingestor = Ingestor::new(pool, dataset).with_batch_rows(batch_rows);
            let stats = ingestor
                .update_from_url(&archive_url)
                .await
                .context("Dataset update failed")?;
            println!(
                "Dataset updated: {} ranges ({} batches), {} cities, {} regions",
                stats.ranges, stats.range_batches, stats.cities, stats.regions
            );
        }
        Command::Lookup { ip, remote } => {
            let resolver = build_resolver(dataset).await?;
            let mode = if remote { Mode::Remote } else { Mode::Local };
            match resolver.resolve(&ip, mode).await? {
                Some(location) => {
                    println!("country: {}", location.country);
                    if let Some(city) = &location.city {
                        println!("city:    {city}");
                    }
                    if let Some(region) = &location.region {
                        println!("region:  {region}");
                    }
                    if let (Some(lat), Some(lng)) = (location.lat, location.lng) {
                        println!("coords:  {lat}, {lng}");
                    }
                }
                None => println!("{ip}: no matching record"),
            }
        }
        Command::Speedtest { iterations, remote } => {
            let resolver = build_resolver(dataset).await?;
            let mode = if remote { Mode::Remote } else { Mode::Local };
            let qps = resolver
                .speed_test(iterations, mode)
                .await
                .context("Speed test failed")?;
            println!("{iterations} lookups: {qps:.0} queries/sec");
        }
    }

    Ok(())
}

async fn build_resolver(dataset: SharedDataset) -> Result<Resolver> {
    let client = init_client()
        .await
        .context("Failed to initialize the HTTP client")?;
    Ok(Resolver::new(dataset, RemoteClient::new(client)))
}
