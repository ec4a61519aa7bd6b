//! Bulk replacement of the persisted dataset.
//!
//! A single transaction truncates and repopulates all three tables, so a
//! failure at any point rolls back to the previous contents and a
//! concurrent reader on another connection never observes a half-replaced
//! table. Regions are written before cities (city rows reference them),
//! ranges last. Inserts are chunked into multi-row statements to respect
//! the backend's statement-size limit; the final partial chunk is flushed
//! even when smaller than the batch size.

use log::{debug, info};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{CityRecord, RangeRecord, RegionRecord};

/// SQLite's SQLITE_MAX_VARIABLE_NUMBER default. One multi-row insert may
/// not bind more variables than this.
const BIND_LIMIT: usize = 32_766;

/// Rows per chunk for a table binding `columns` variables per row, so a
/// full chunk of a wide table still fits one statement.
fn chunk_rows(batch_rows: usize, columns: usize) -> usize {
    batch_rows.clamp(1, BIND_LIMIT / columns)
}

/// Counts of statements executed by one replacement, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub range_batches: usize,
}

/// Replaces the contents of all three tables with the given records.
pub async fn replace_dataset(
    pool: &SqlitePool,
    ranges: &[RangeRecord],
    cities: &[CityRecord],
    regions: &[RegionRecord],
    batch_rows: usize,
) -> Result<ReplaceSummary, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM geobase_region")
        .execute(&mut *tx)
        .await?;
    for chunk in regions.chunks(chunk_rows(batch_rows, 2)) {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO geobase_region (id, name) ");
        qb.push_values(chunk, |mut b, region| {
            b.push_bind(i64::from(region.id)).push_bind(&region.name);
        });
        qb.build().execute(&mut *tx).await?;
    }

    sqlx::query("DELETE FROM geobase_city")
        .execute(&mut *tx)
        .await?;
    for chunk in cities.chunks(chunk_rows(batch_rows, 5)) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO geobase_city (id, name, region_id, latitude, longitude) ",
        );
        qb.push_values(chunk, |mut b, city| {
            b.push_bind(i64::from(city.id))
                .push_bind(&city.name)
                .push_bind(i64::from(city.region_id))
                .push_bind(city.latitude)
                .push_bind(city.longitude);
        });
        qb.build().execute(&mut *tx).await?;
    }

    sqlx::query("DELETE FROM geobase_ip")
        .execute(&mut *tx)
        .await?;
    let mut range_batches = 0;
    for chunk in ranges.chunks(chunk_rows(batch_rows, 4)) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO geobase_ip (ip_begin, ip_end, country_code, city_id) ",
        );
        qb.push_values(chunk, |mut b, range| {
            b.push_bind(i64::from(range.ip_begin))
                .push_bind(i64::from(range.ip_end))
                .push_bind(&range.country_code)
                .push_bind(i64::from(range.city_id));
        });
        qb.build().execute(&mut *tx).await?;
        range_batches += 1;
        debug!("Flushed range batch {range_batches} ({} rows)", chunk.len());
    }

    tx.commit().await?;
    info!(
        "Replaced dataset: {} ranges in {} batches, {} cities, {} regions",
        ranges.len(),
        range_batches,
        cities.len(),
        regions.len()
    );
    Ok(ReplaceSummary { range_batches })
}
