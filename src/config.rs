use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

// constants (used as defaults)
pub const DB_PATH: &str = "./geobase.db";

/// Remote geolocation endpoint. The IP address is appended verbatim.
pub const XML_URL: &str = "http://ipgeobase.ru:7020/geo?ip=";

/// Vendor archive with the full dataset (gzipped tar with two members).
pub const ARCHIVE_URL: &str = "http://ipgeobase.ru/files/db/Main/geo_files.tar.gz";

/// In-archive name of the ranges file.
pub const ARCHIVE_IPS_FILE: &str = "cidr_optim.txt";

/// In-archive name of the cities file.
pub const ARCHIVE_CITIES_FILE: &str = "cities.txt";

/// Rows per bulk INSERT statement during ingestion.
///
/// The upstream vendor loader used 20,000-row statements against MySQL.
/// SQLite caps one statement at 32,766 bind variables, so each table
/// clamps its chunk to the limit divided by its column count (a range
/// row binds 4 variables, a city row 5); this default keeps range
/// batches exactly this size while wider tables clamp lower. The batch
/// size is configurable via `--batch-rows` for other backends.
pub const INSERT_BATCH_ROWS: usize = 8_000;

// Network operation timeouts
/// Per-request timeout for remote lookups in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// Timeout for the archive download in seconds (the full dataset is tens of MB)
pub const ARCHIVE_TIMEOUT_SECS: u64 = 300;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace). Used with the `--log-level` CLI option.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command-line options and configuration.
///
/// This struct is automatically generated by `clap` from the field attributes.
///
/// # Examples
///
/// ```bash
/// # Download the vendor archive and rebuild the local dataset
/// ipgeobase update
///
/// # Resolve an address from the local dataset
/// ipgeobase lookup 144.206.192.6
///
/// # Resolve via the remote service instead
/// ipgeobase lookup 144.206.192.6 --remote
///
/// # Measure local lookup throughput
/// ipgeobase speedtest 100000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ipgeobase",
    about = "Resolves IPv4 addresses to geographic locations using the IpGeoBase dataset."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the vendor archive and replace the local dataset
    Update {
        /// Archive URL to fetch
        #[arg(long, default_value = ARCHIVE_URL)]
        archive_url: String,

        /// Rows per bulk INSERT statement
        #[arg(long, default_value_t = INSERT_BATCH_ROWS)]
        batch_rows: usize,
    },

    /// Resolve a single IPv4 address
    Lookup {
        /// The address to resolve, e.g. 144.206.192.6
        ip: String,

        /// Query the remote geolocation service instead of the local dataset
        #[arg(long)]
        remote: bool,
    },

    /// Measure resolution throughput with random addresses
    Speedtest {
        /// Number of synthetic addresses to resolve
        iterations: usize,

        /// Probe the remote service instead of the local dataset
        #[arg(long)]
        remote: bool,
    },
}
