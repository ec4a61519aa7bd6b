//! Record types for the geobase dataset and lookup results.

use serde::Serialize;

/// One row of the ranges table: a contiguous IPv4 interval mapped to a
/// country and (optionally) a city.
///
/// `city_id == 0` means the range has no city association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord {
    pub ip_begin: u32,
    pub ip_end: u32,
    pub country_code: String,
    pub city_id: u32,
}

/// A city row from the vendor feed. The `id` is assigned upstream, not
/// generated locally.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub id: u32,
    pub name: String,
    pub region_id: u32,
    pub latitude: f64,
    pub longitude: f64,
}

/// A region row. The `id` is a locally assigned surrogate, starting at 1
/// in first-seen order within a single ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRecord {
    pub id: u32,
    pub name: String,
}

/// The result of resolving an IP address, in either local or remote mode.
///
/// Only the country is always present; the remaining fields depend on
/// whether the matched range carries a city association (local mode) or
/// on what the remote service returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub country: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
