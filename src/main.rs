use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hotel_merger::{
    suppliers_from_config, AppConfig, FilterCriteria, HotelService, InMemoryHotelRepository,
};

#[derive(Debug, Parser)]
#[command(name = "hotel_merger")]
#[command(about = "Merge hotel data from all suppliers and print the matching hotels as JSON")]
struct Cli {
    /// Comma-separated hotel ids, or "none"
    #[arg(default_value = "none")]
    hotel_ids: String,

    /// Comma-separated destination ids, or "none"
    #[arg(default_value = "none")]
    destination_ids: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the JSON result, logs go to stderr
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let criteria = FilterCriteria::from_args(&cli.hotel_ids, &cli.destination_ids);

    let config = AppConfig::from_env().context("loading configuration")?;
    let client = config.http_client().context("building HTTP client")?;

    let mut service = HotelService::new(
        InMemoryHotelRepository::new(),
        suppliers_from_config(&config),
        client,
    );
    service
        .process_hotels()
        .await
        .context("fetching supplier data")?;

    let hotels = service.find_hotels(&criteria);
    let json = serde_json::to_string_pretty(&hotels).context("serializing hotels")?;
    println!("{json}");

    Ok(())
}
