use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gnss_survey::config::Config;
use gnss_survey::coords::parse_dms;
use gnss_survey::download::{HttpFetcher, download_products};
use gnss_survey::gpstime::gps_time_from_str;
use gnss_survey::logging::{self, Component, LogLevel};
use gnss_survey::model::{Coordinate, Product, StationRecord};
use gnss_survey::products::build_product_urls;
use gnss_survey::ranking::rank_nearest;
use gnss_survey::render;
use gnss_survey::stations::{default_stations, load_stations};

#[derive(Parser)]
#[command(name = "gnss-survey", version, about = "GPS week conversion, ephemeris download and nearest reference stations")]
struct Cli {
    /// Configuration file (defaults to $GNSS_SURVEY_CONFIG, then ./gnss_survey.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show GPS week, day of week and day of year for a date
    GpsTime {
        /// DD-MM-YYYY or YYYY-MM-DD
        date: String,
    },
    /// Print ephemeris download URLs for a date
    Urls(ProductArgs),
    /// Download ephemeris files for a date
    Download {
        #[command(flatten)]
        products: ProductArgs,
        /// Output directory (overrides [download] output_dir)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Rank reference stations by distance to a point
    Nearest(NearestArgs),
}

#[derive(Args)]
struct ProductArgs {
    /// DD-MM-YYYY or YYYY-MM-DD
    date: String,
    /// Products to include; repeat or comma-separate. Defaults to all.
    #[arg(short, long, value_enum, value_delimiter = ',')]
    product: Vec<ProductArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProductArg {
    Precise,
    Rapid,
    Gfz,
}

impl From<ProductArg> for Product {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::Precise => Product::Precise,
            ProductArg::Rapid => Product::Rapid,
            ProductArg::Gfz => Product::Gfz,
        }
    }
}

#[derive(Args)]
struct NearestArgs {
    /// Latitude, decimal degrees
    #[arg(long, allow_hyphen_values = true, required_unless_present = "lat_dms", conflicts_with = "lat_dms")]
    lat: Option<f64>,
    /// Longitude, decimal degrees
    #[arg(long, allow_hyphen_values = true, required_unless_present = "lon_dms", conflicts_with = "lon_dms")]
    lon: Option<f64>,
    /// Latitude as degrees minutes seconds, e.g. "4 35 56.57"
    #[arg(long, allow_hyphen_values = true)]
    lat_dms: Option<String>,
    /// Longitude as degrees minutes seconds, e.g. "-74 4 51.3"
    #[arg(long, allow_hyphen_values = true)]
    lon_dms: Option<String>,
    /// Number of stations to list (overrides [stations] default_k)
    #[arg(short)]
    k: Option<NonZeroUsize>,
    /// Station table (overrides [stations] table)
    #[arg(long, value_name = "FILE")]
    stations: Option<PathBuf>,
    /// Also write the result as GeoJSON
    #[arg(long, value_name = "FILE")]
    geojson: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        logging::error(Component::System, None, &e.to_string());
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.config.as_deref())?;

    let level = if cli.verbose { LogLevel::Debug } else { config.log.level };
    logging::init_logger(level, config.log.file.as_deref(), config.log.timestamps);
    logging::debug(Component::Config, None, &format!("{:?}", config));

    match cli.command {
        Command::GpsTime { date } => {
            let id = gps_time_from_str(&date)?;
            logging::debug(Component::GpsTime, None, &format!("{} -> {:?}", date, id));
            print!("{}", render::gps_time_table(&id));
        }
        Command::Urls(args) => {
            let id = gps_time_from_str(&args.date)?;
            let descriptors = build_product_urls(&id, &selected_products(&args.product), &config.products)?;
            print!("{}", render::product_table(&descriptors));
        }
        Command::Download { products, output } => {
            let id = gps_time_from_str(&products.date)?;
            let descriptors = build_product_urls(&id, &selected_products(&products.product), &config.products)?;
            logging::info(
                Component::Products,
                None,
                &format!("GPS week {} day {} ({:05})", id.week, id.day_of_week, id.composite_id),
            );

            let output_dir = output.unwrap_or_else(|| config.download.output_dir.clone());
            let fetcher = HttpFetcher::new(config.download.timeout())?;
            let report = download_products(&fetcher, &descriptors, &output_dir)?;

            for path in &report.saved {
                println!("{}", path.display());
            }
            if report.saved.is_empty() && !report.failed.is_empty() {
                return Err(format!("none of the {} requested products could be downloaded", report.failed.len()).into());
            }
        }
        Command::Nearest(args) => nearest(args, &config)?,
    }

    Ok(())
}

fn selected_products(args: &[ProductArg]) -> Vec<Product> {
    if args.is_empty() {
        Product::ALL.to_vec()
    } else {
        args.iter().map(|&p| p.into()).collect()
    }
}

fn nearest(args: NearestArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let latitude = match (args.lat, &args.lat_dms) {
        (Some(value), _) => value,
        (None, Some(text)) => parse_dms(text)?,
        (None, None) => return Err("a latitude is required (--lat or --lat-dms)".into()),
    };
    let longitude = match (args.lon, &args.lon_dms) {
        (Some(value), _) => value,
        (None, Some(text)) => parse_dms(text)?,
        (None, None) => return Err("a longitude is required (--lon or --lon-dms)".into()),
    };
    let reference = Coordinate::new(latitude, longitude)?;

    let table = args.stations.as_ref().or(config.stations.table.as_ref());
    let stations: Vec<StationRecord> = match table {
        Some(path) => load_stations(path)?,
        None => default_stations()?,
    };
    logging::debug(Component::Stations, None, &format!("{} stations loaded", stations.len()));

    let k = args.k.map_or(config.stations.default_k, NonZeroUsize::get);
    let ranked = rank_nearest(&reference, &stations, k)?;
    logging::debug(Component::Ranking, None, &format!("{} nearest to {}", ranked.len(), reference));

    print!("{}", render::station_table(&ranked));

    if let Some(path) = args.geojson {
        let doc = render::ranking_geojson(&reference, &ranked);
        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        logging::info(Component::Ranking, None, &format!("GeoJSON written to {}", path.display()));
    }

    Ok(())
}
