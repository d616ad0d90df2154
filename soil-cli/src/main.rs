use anyhow::Result;
use clap::{Parser, Subcommand};
use soil::{Depth, SoilProperty, ValueKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::list::Catalog;
use commands::ClientOptions;

/// Soil property and soil type query tool
#[derive(Parser)]
#[command(name = "soil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the soil API
    #[arg(long, env = "SOIL_API_URL", global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SOIL_API_TIMEOUT", default_value = "30", global = true)]
    timeout: u64,

    /// Retry attempts on transient failure
    #[arg(long, env = "SOIL_API_MAX_RETRIES", default_value = "2", global = true)]
    retries: u32,

    /// Output results as JSON
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query soil property values at a point
    Property {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Depth interval (e.g. 0-5cm); repeat or comma-separate
        #[arg(long = "depth", required = true, value_delimiter = ',')]
        depths: Vec<Depth>,

        /// Property code (e.g. bdod); repeat or comma-separate
        #[arg(long = "property", required = true, value_delimiter = ',')]
        properties: Vec<SoilProperty>,

        /// Statistic (mean, Q0.05, Q0.5, Q0.95, uncertainty)
        #[arg(long = "value", value_delimiter = ',', default_value = "mean")]
        values: Vec<ValueKind>,

        /// Convert values from mapped units to target units
        #[arg(short, long)]
        convert: bool,
    },

    /// Query a single property value at a single depth
    Value {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Depth interval (e.g. 0-5cm)
        #[arg(long)]
        depth: Depth,

        /// Property code (e.g. soc)
        #[arg(long)]
        property: SoilProperty,
    },

    /// Query the most probable soil type at a point
    Type {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Also list the k most probable soil types (0-30)
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },

    /// Summarise soil types within a bounding box
    Summary {
        /// Western boundary longitude
        #[arg(long, allow_hyphen_values = true)]
        min_lon: f64,

        /// Eastern boundary longitude
        #[arg(long, allow_hyphen_values = true)]
        max_lon: f64,

        /// Southern boundary latitude
        #[arg(long, allow_hyphen_values = true)]
        min_lat: f64,

        /// Northern boundary latitude
        #[arg(long, allow_hyphen_values = true)]
        max_lat: f64,
    },

    /// Check that the service is alive
    Health,

    /// Check that the service and its data source are ready
    Ready,

    /// Add soil data to every point in a CSV or GeoJSON file
    Batch {
        /// Input file (CSV or GeoJSON)
        input: PathBuf,

        /// Output file (same format as input if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude (CSV only)
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude (CSV only)
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Property codes to add; soil type is added when none are given
        #[arg(long = "property", value_delimiter = ',')]
        properties: Vec<SoilProperty>,

        /// Depth intervals for property mode
        #[arg(long = "depth", value_delimiter = ',', requires = "properties")]
        depths: Vec<Depth>,

        /// Statistics for property mode [default: mean]
        #[arg(long = "value", value_delimiter = ',', requires = "properties")]
        values: Vec<ValueKind>,

        /// Soil type probabilities to include (soil type mode)
        #[arg(short = 'k', long, conflicts_with = "properties")]
        top_k: Option<u32>,
    },

    /// List the parameters the service understands
    List {
        /// Catalogue to show (all if omitted)
        #[arg(value_enum)]
        catalog: Option<Catalog>,
    },

    /// Display details about a soil property
    Info {
        /// Property code (e.g. bdod)
        property: SoilProperty,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soil=warn,soil_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let options = ClientOptions {
        base_url: cli.base_url,
        timeout: cli.timeout,
        retries: cli.retries,
    };

    match cli.command {
        Commands::Property {
            lat,
            lon,
            depths,
            properties,
            values,
            convert,
        } => commands::property::run(
            &options, lat, lon, depths, properties, values, convert, cli.json,
        ),
        Commands::Value {
            lat,
            lon,
            depth,
            property,
        } => commands::value::run(&options, lat, lon, depth, property, cli.json),
        Commands::Type { lat, lon, top_k } => {
            commands::soil_type::run(&options, lat, lon, top_k, cli.json)
        }
        Commands::Summary {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        } => commands::summary::run(&options, min_lon, max_lon, min_lat, max_lat, cli.json),
        Commands::Health => commands::health::liveness(&options, cli.json),
        Commands::Ready => commands::health::readiness(&options, cli.json),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
            properties,
            depths,
            values,
            top_k,
        } => commands::batch::run(
            &options,
            input,
            output,
            lat_col,
            lon_col,
            commands::batch::Mode::new(properties, depths, values, top_k),
        ),
        Commands::List { catalog } => commands::list::run(catalog, cli.json),
        Commands::Info { property } => commands::info::run(property, cli.json),
    }
}
