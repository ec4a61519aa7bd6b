//! Ingestion of the vendor feed into the local dataset.
//!
//! One run extracts the two member files from the archive, parses them,
//! replaces the three backing tables in a single transaction, and then
//! publishes the new in-memory generation as one atomic swap. Any failure
//! aborts the run and leaves the previously published generation fully
//! queryable; there is no partial-success state.

use std::sync::Arc;

use log::{info, warn};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::archive::{extract_member, fetch_archive};
use crate::config::{ARCHIVE_CITIES_FILE, ARCHIVE_IPS_FILE, INSERT_BATCH_ROWS};
use crate::error_handling::IngestError;
use crate::feed::parse_feed;
use crate::storage::replace_dataset;
use crate::store::{Catalog, Generation, RangeStore, SharedDataset};

/// Counts from one successful ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub ranges: usize,
    pub cities: usize,
    pub regions: usize,
    /// Number of bulk INSERT statements used for the ranges table.
    pub range_batches: usize,
}

/// Coordinates dataset replacement.
///
/// Single-writer: concurrent calls to [`Ingestor::ingest`] are serialized
/// on an internal lock, so at most one run touches the tables at a time.
pub struct Ingestor {
    pool: Arc<SqlitePool>,
    dataset: SharedDataset,
    batch_rows: usize,
    writer: Mutex<()>,
}

impl Ingestor {
    pub fn new(pool: Arc<SqlitePool>, dataset: SharedDataset) -> Self {
        Ingestor {
            pool,
            dataset,
            batch_rows: INSERT_BATCH_ROWS,
            writer: Mutex::new(()),
        }
    }

    /// Overrides the rows-per-statement batch size.
    pub fn with_batch_rows(mut self, batch_rows: usize) -> Self {
        self.batch_rows = batch_rows;
        self
    }

    /// Downloads the vendor archive and ingests it.
    pub async fn update_from_url(&self, url: &str) -> Result<IngestStats, IngestError> {
        let archive = fetch_archive(url).await?;
        self.ingest(&archive).await
    }

    /// Replaces the local dataset with the contents of `archive`.
    ///
    /// Steps, in order: extract member files, parse and validate the feed,
    /// replace regions + cities + ranges inside one backend transaction,
    /// publish the new generation. A failure at any step propagates
    /// without touching the published generation.
    pub async fn ingest(&self, archive: &[u8]) -> Result<IngestStats, IngestError> {
        let _writer = self.writer.lock().await;

        let ranges_raw = extract_member(archive, ARCHIVE_IPS_FILE)?;
        let cities_raw = extract_member(archive, ARCHIVE_CITIES_FILE)?;

        let mut feed = parse_feed(&ranges_raw, &cities_raw)?;

        // The feed arrives in arbitrary order; the begin-sorted vector is
        // the canonical index, and RangeStore::new rejects overlaps.
        feed.ranges.sort_by_key(|r| r.ip_begin);
        let ranges = RangeStore::new(std::mem::take(&mut feed.ranges))?;

        let stats = IngestStats {
            ranges: ranges.len(),
            cities: feed.cities.len(),
            regions: feed.regions.len(),
            range_batches: 0,
        };
        if stats.ranges == 0 {
            warn!("Feed contains no range records; ingesting an empty dataset");
        }

        let summary = replace_dataset(
            &self.pool,
            ranges.records(),
            &feed.cities,
            &feed.regions,
            self.batch_rows,
        )
        .await?;

        self.dataset.publish(Generation {
            ranges,
            catalog: Catalog::new(feed.cities, feed.regions),
        });
        info!(
            "Published new dataset generation: {} ranges, {} cities, {} regions",
            stats.ranges, stats.cities, stats.regions
        );

        Ok(IngestStats {
            range_batches: summary.range_batches,
            ..stats
        })
    }
}
