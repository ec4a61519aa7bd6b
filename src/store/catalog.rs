//! City and region lookups by primary key.

use std::collections::HashMap;

use crate::models::{CityRecord, RegionRecord};

/// Deduplicated region records plus the city records referencing them.
///
/// Built once per ingestion run and replaced wholesale; readers always see
/// a single consistent generation.
#[derive(Debug, Default)]
pub struct Catalog {
    cities: HashMap<u32, CityRecord>,
    regions: HashMap<u32, RegionRecord>,
}

impl Catalog {
    pub fn new(cities: Vec<CityRecord>, regions: Vec<RegionRecord>) -> Self {
        Catalog {
            cities: cities.into_iter().map(|c| (c.id, c)).collect(),
            regions: regions.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn resolve_city(&self, city_id: u32) -> Option<&CityRecord> {
        self.cities.get(&city_id)
    }

    pub fn resolve_region(&self, region_id: u32) -> Option<&RegionRecord> {
        self.regions.get(&region_id)
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}
