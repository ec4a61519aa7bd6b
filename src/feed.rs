//! Parser for the vendor's flat-file feed.
//!
//! The archive carries two tab-separated text files encoded in windows-1251:
//! a ranges file (`cidr_optim.txt`) and a cities file (`cities.txt`). Both
//! are transcoded to UTF-8 before parsing. Region rows are deduplicated by
//! exact transcoded-name equality and assigned surrogate ids starting at 1
//! in first-seen order.

use std::collections::BTreeMap;
use std::collections::HashMap;

use encoding_rs::WINDOWS_1251;
use thiserror::Error;

use crate::config::{ARCHIVE_CITIES_FILE, ARCHIVE_IPS_FILE};
use crate::models::{CityRecord, RangeRecord, RegionRecord};

/// A row violated the expected feed shape. Ingestion-fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file} line {line}: {reason}")]
pub struct FeedError {
    pub file: &'static str,
    pub line: usize,
    pub reason: String,
}

/// Normalized in-memory records produced from one feed.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    /// Range records in feed order (not yet sorted).
    pub ranges: Vec<RangeRecord>,
    /// City records in ascending id order; a repeated id keeps the last row.
    pub cities: Vec<CityRecord>,
    /// Region records in surrogate-id order (first-seen order).
    pub regions: Vec<RegionRecord>,
}

/// Parses the raw bytes of both member files into normalized records.
pub fn parse_feed(ranges_raw: &[u8], cities_raw: &[u8]) -> Result<ParsedFeed, FeedError> {
    let ranges = parse_ranges(&decode(ranges_raw))?;
    let (cities, regions) = parse_cities(&decode(cities_raw))?;
    Ok(ParsedFeed {
        ranges,
        cities,
        regions,
    })
}

fn decode(raw: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1251.decode(raw);
    text.into_owned()
}

/// Splits a feed file into rows, discarding the trailing blank line that
/// the vendor's trailing line terminator produces.
fn feed_rows(text: &str) -> Vec<&str> {
    let mut rows: Vec<&str> = text.split('\n').collect();
    if rows.last() == Some(&"") {
        rows.pop();
    }
    rows
}

fn parse_number<T: std::str::FromStr>(
    field: &str,
    what: &str,
    file: &'static str,
    line: usize,
) -> Result<T, FeedError> {
    field.parse().map_err(|_| FeedError {
        file,
        line,
        reason: format!("{what} is not a number: {field:?}"),
    })
}

/// Row shape: `ip_begin \t ip_end \t <ignored> \t country_code \t city_id_or_dash`.
fn parse_ranges(text: &str) -> Result<Vec<RangeRecord>, FeedError> {
    const FILE: &str = ARCHIVE_IPS_FILE;

    let mut records = Vec::new();
    for (idx, row) in feed_rows(text).iter().enumerate() {
        let line = idx + 1;
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 5 {
            return Err(FeedError {
                file: FILE,
                line,
                reason: format!("expected 5 fields, got {}", fields.len()),
            });
        }

        let city_id = match fields[4] {
            "-" => 0,
            other => parse_number(other, "city id", FILE, line)?,
        };
        records.push(RangeRecord {
            ip_begin: parse_number(fields[0], "ip_begin", FILE, line)?,
            ip_end: parse_number(fields[1], "ip_end", FILE, line)?,
            country_code: fields[3].to_string(),
            city_id,
        });
    }
    Ok(records)
}

/// Row shape: `city_id \t city_name \t region_name \t <ignored> \t lat \t lng`.
///
/// Regions deduplicate on the transcoded name; the surrogate id counts up
/// from 1 in first-seen order. Cities are keyed by their upstream id, with
/// a later row for the same id replacing the earlier one.
fn parse_cities(text: &str) -> Result<(Vec<CityRecord>, Vec<RegionRecord>), FeedError> {
    const FILE: &str = ARCHIVE_CITIES_FILE;

    let mut cities: BTreeMap<u32, CityRecord> = BTreeMap::new();
    let mut region_ids: HashMap<String, u32> = HashMap::new();
    let mut regions: Vec<RegionRecord> = Vec::new();

    for (idx, row) in feed_rows(text).iter().enumerate() {
        let line = idx + 1;
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 6 {
            return Err(FeedError {
                file: FILE,
                line,
                reason: format!("expected 6 fields, got {}", fields.len()),
            });
        }

        let region_name = fields[2];
        let region_id = match region_ids.get(region_name) {
            Some(&id) => id,
            None => {
                let id = regions.len() as u32 + 1;
                region_ids.insert(region_name.to_string(), id);
                regions.push(RegionRecord {
                    id,
                    name: region_name.to_string(),
                });
                id
            }
        };

        let id = parse_number(fields[0], "city id", FILE, line)?;
        cities.insert(
            id,
            CityRecord {
                id,
                name: fields[1].to_string(),
                region_id,
                latitude: parse_number(fields[4], "latitude", FILE, line)?,
                longitude: parse_number(fields[5], "longitude", FILE, line)?,
            },
        );
    }

    Ok((cities.into_values().collect(), regions))
}
