//! Loads the persisted dataset into an in-memory generation.

use log::info;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::{CityRecord, RangeRecord, RegionRecord};
use crate::store::{Catalog, Generation, RangeStore};

/// Narrows a persisted integer column to the record type, rejecting the
/// dataset as corrupt instead of truncating an out-of-range value.
fn to_u32(value: i64, column: &'static str) -> Result<u32, DatabaseError> {
    u32::try_from(value).map_err(|_| DatabaseError::OutOfRangeColumn { column, value })
}

/// Reads all three tables and builds a generation for publication.
///
/// The ranges table is read in `ip_begin` order, which the unique index
/// makes cheap; if the persisted rows violate the non-overlapping
/// invariant the dataset is rejected as corrupt rather than served.
pub async fn load_dataset(pool: &SqlitePool) -> Result<Generation, DatabaseError> {
    let range_rows =
        sqlx::query("SELECT ip_begin, ip_end, country_code, city_id FROM geobase_ip ORDER BY ip_begin")
            .fetch_all(pool)
            .await?;
    let mut records = Vec::with_capacity(range_rows.len());
    for row in &range_rows {
        records.push(RangeRecord {
            ip_begin: to_u32(row.get("ip_begin"), "geobase_ip.ip_begin")?,
            ip_end: to_u32(row.get("ip_end"), "geobase_ip.ip_end")?,
            country_code: row.get("country_code"),
            city_id: to_u32(row.get("city_id"), "geobase_ip.city_id")?,
        });
    }
    let ranges = RangeStore::new(records)?;

    let city_rows =
        sqlx::query("SELECT id, name, region_id, latitude, longitude FROM geobase_city")
            .fetch_all(pool)
            .await?;
    let mut cities = Vec::with_capacity(city_rows.len());
    for row in &city_rows {
        cities.push(CityRecord {
            id: to_u32(row.get("id"), "geobase_city.id")?,
            name: row.get("name"),
            region_id: to_u32(row.get("region_id"), "geobase_city.region_id")?,
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
        });
    }

    let region_rows = sqlx::query("SELECT id, name FROM geobase_region")
        .fetch_all(pool)
        .await?;
    let mut regions = Vec::with_capacity(region_rows.len());
    for row in &region_rows {
        regions.push(RegionRecord {
            id: to_u32(row.get("id"), "geobase_region.id")?,
            name: row.get("name"),
        });
    }

    info!(
        "Loaded dataset: {} ranges, {} cities, {} regions",
        ranges.len(),
        cities.len(),
        regions.len()
    );
    Ok(Generation {
        ranges,
        catalog: Catalog::new(cities, regions),
    })
}
