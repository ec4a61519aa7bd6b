//! ipgeobase library: IPv4 geolocation against the IpGeoBase dataset
//!
//! This library resolves IPv4 addresses to geographic locations. It keeps
//! the vendor dataset in a local SQLite database, serves point queries
//! from an in-memory range index, and can fall back to the vendor's
//! remote HTTP service for individual lookups.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ipgeobase::{Mode, RemoteClient, Resolver, SharedDataset};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = SharedDataset::default();
//! let client = Arc::new(reqwest::Client::new());
//! let resolver = Resolver::new(dataset, RemoteClient::new(client));
//!
//! if let Some(location) = resolver.resolve("144.206.192.6", Mode::Remote).await? {
//!     println!("{}: {:?}", location.country, location.city);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call library functions from an async context.

pub mod archive;
pub mod config;
pub mod error_handling;
pub mod feed;
pub mod ingest;
pub mod initialization;
pub mod models;
pub mod remote;
pub mod resolver;
pub mod storage;
pub mod store;

// Re-export public API
pub use error_handling::{DatabaseError, IngestError, ResolveError};
pub use ingest::{IngestStats, Ingestor};
pub use models::Location;
pub use remote::RemoteClient;
pub use resolver::{Mode, Resolver};
pub use storage::{init_db_pool_with_path, load_dataset, run_migrations};
pub use store::{Generation, SharedDataset};
