//! AISHub vessel lookup CLI
//!
//! Queries the AISHub webservice and prints the normalized vessel records.

use aishub::{
    client::AisHubClient,
    codec, parser,
    query::{ApiConfig, BoundingBox, Compress, Format, Output, VesselQuery},
    types::ApiResponse,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "aishub")]
#[command(about = "AISHub vessel-tracking API client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Field format (ais, human)
    #[arg(long, default_value = "human")]
    format: Format,

    /// Output format (json, xml, csv)
    #[arg(short, long, default_value = "json")]
    output: Output,

    /// Payload compression (none, zip, gzip, bzip2)
    #[arg(short, long, default_value = "none")]
    compress: Compress,

    /// Override the webservice endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a single vessel by MMSI or IMO number
    Vessel {
        /// Account username as issued by AISHub
        #[arg(short, long, env = "AISHUB_USERNAME")]
        username: String,

        /// MMSI of the vessel
        #[arg(long)]
        mmsi: Option<u32>,

        /// IMO number of the vessel
        #[arg(long)]
        imo: Option<u32>,
    },

    /// List vessels inside a bounding box
    Area {
        /// Account username as issued by AISHub
        #[arg(short, long, env = "AISHUB_USERNAME")]
        username: String,

        /// South bound of bounding box
        #[arg(long, default_value = "-90")]
        latmin: f64,

        /// North bound of bounding box
        #[arg(long, default_value = "90")]
        latmax: f64,

        /// West bound of bounding box
        #[arg(long, default_value = "-180")]
        lonmin: f64,

        /// East bound of bounding box
        #[arg(long, default_value = "180")]
        lonmax: f64,
    },

    /// List every record visible to the account
    All {
        /// Account username as issued by AISHub
        #[arg(short, long, env = "AISHUB_USERNAME")]
        username: String,
    },

    /// Parse a saved payload file (for testing)
    Parse {
        /// Path to the payload file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &cli.command {
        Commands::Vessel {
            username,
            mmsi,
            imo,
        } => {
            let query = VesselQuery::Vessel {
                mmsi: *mmsi,
                imo: *imo,
            };
            run_query(&cli, username.clone(), query).await?;
        }

        Commands::Area {
            username,
            latmin,
            latmax,
            lonmin,
            lonmax,
        } => {
            let bbox = BoundingBox::new(*latmin, *latmax, *lonmin, *lonmax);
            run_query(&cli, username.clone(), VesselQuery::Area(bbox)).await?;
        }

        Commands::All { username } => {
            run_query(&cli, username.clone(), VesselQuery::All).await?;
        }

        Commands::Parse { file } => {
            parse_file(&cli, file)?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli, username: String) -> ApiConfig {
    ApiConfig::new(username)
        .with_format(cli.format)
        .with_output(cli.output)
        .with_compress(cli.compress)
        .with_timeout(Duration::from_secs(cli.timeout))
}

async fn run_query(
    cli: &Cli,
    username: String,
    query: VesselQuery,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = AisHubClient::new(build_config(cli, username))?;
    if let Some(url) = &cli.base_url {
        client = client.with_base_url(url.clone());
    }

    let response = client.fetch(&query).await?;
    print_response(&response);
    Ok(())
}

fn parse_file(cli: &Cli, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;

    tracing::info!("Parsing file: {} ({} bytes)", path.display(), data.len());

    let text = codec::decompress(cli.compress, &data)?;
    let response = parser::parse_response(cli.output, &text)?;
    print_response(&response);
    Ok(())
}

fn print_response(response: &ApiResponse) {
    let header = &response.header;

    if header.error {
        println!("Provider error: {}", header.error_message);
        return;
    }

    println!("Header:");
    if !header.username.is_empty() {
        println!("  Username: {}", header.username);
    }
    if !header.format.is_empty() {
        println!("  Format: {}", header.format);
    }
    println!("  Records: {}", header.records);
    println!();
    println!("Parsed {} vessel records", response.vessels.len());
    println!();

    // Show first 10 records
    for (i, vessel) in response.vessels.iter().take(10).enumerate() {
        println!("Record {}:", i + 1);

        if let Some(mmsi) = vessel.mmsi() {
            println!("  MMSI: {}", mmsi);
        }

        if let Some(name) = vessel.name() {
            println!("  Name: {}", name);
        }

        if let Some(callsign) = vessel.callsign() {
            println!("  Callsign: {}", callsign);
        }

        if let (Some(lat), Some(lon)) = (vessel.latitude(), vessel.longitude()) {
            println!("  Position: {:.6}, {:.6}", lat, lon);
        }

        if let Some(dest) = vessel.destination() {
            println!("  Destination: {}", dest);
        }

        println!();
    }

    if response.vessels.len() > 10 {
        println!("... and {} more records", response.vessels.len() - 10);
    }
}
