//! SQLite persistence for the geobase dataset.
//!
//! Three tables (`geobase_ip`, `geobase_city`, `geobase_region`) hold the
//! dataset between process restarts. All writes go through
//! [`replace_dataset`], a single-transaction truncate-and-bulk-insert;
//! reads load the whole dataset into an in-memory generation.

mod load;
mod migrations;
mod pool;
mod replace;

pub use load::load_dataset;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use replace::{replace_dataset, ReplaceSummary};
