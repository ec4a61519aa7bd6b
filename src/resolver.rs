//! The resolution facade.
//!
//! Normalizes both strategies into one result shape: local mode answers
//! from the published dataset generation, remote mode delegates to the
//! vendor's geolocation service. "No matching record" is `Ok(None)` in
//! both modes.

use std::net::Ipv4Addr;
use std::time::Instant;

use rand::Rng;

use crate::error_handling::ResolveError;
use crate::models::Location;
use crate::remote::RemoteClient;
use crate::store::SharedDataset;

/// Which dataset answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Served from the locally ingested dataset.
    Local,
    /// Served by the external geolocation service, one HTTP call per query.
    Remote,
}

pub struct Resolver {
    dataset: SharedDataset,
    remote: RemoteClient,
}

impl Resolver {
    pub fn new(dataset: SharedDataset, remote: RemoteClient) -> Self {
        Resolver { dataset, remote }
    }

    /// Resolves one address in the given mode.
    pub async fn resolve(&self, ip: &str, mode: Mode) -> Result<Option<Location>, ResolveError> {
        let addr: Ipv4Addr = ip
            .trim()
            .parse()
            .map_err(|_| ResolveError::InvalidIp(ip.to_string()))?;
        match mode {
            Mode::Local => Ok(self.resolve_local(addr)),
            Mode::Remote => self.remote.locate(ip.trim()).await,
        }
    }

    /// Point lookup against the published generation.
    ///
    /// Joins the matched range through the catalog: city name, region
    /// name and coordinates come from the city record; the country code
    /// is returned verbatim from the range. A range without a city
    /// association (or with a dangling city id) yields a country-only
    /// location, mirroring the LEFT JOIN the tables were designed for.
    pub fn resolve_local(&self, addr: Ipv4Addr) -> Option<Location> {
        let generation = self.dataset.snapshot();
        let record = generation.ranges.lookup(u32::from(addr))?;

        let mut location = Location {
            country: record.country_code.clone(),
            city: None,
            region: None,
            lat: None,
            lng: None,
        };
        if record.city_id != 0 {
            if let Some(city) = generation.catalog.resolve_city(record.city_id) {
                location.city = Some(city.name.clone());
                location.lat = Some(city.latitude);
                location.lng = Some(city.longitude);
                location.region = generation
                    .catalog
                    .resolve_region(city.region_id)
                    .map(|r| r.name.clone());
            }
        }
        Some(location)
    }

    /// Throughput probe: resolves `iterations` random IPv4 addresses and
    /// reports achieved queries per second. Capacity planning only; the
    /// addresses are synthetic and most will miss.
    pub async fn speed_test(&self, iterations: usize, mode: Mode) -> Result<f64, ResolveError> {
        let mut rng = rand::rng();
        let ips: Vec<String> = (0..iterations)
            .map(|_| Ipv4Addr::from(rng.random::<u32>()).to_string())
            .collect();

        let begin = Instant::now();
        for ip in &ips {
            self.resolve(ip, mode).await?;
        }
        let elapsed = begin.elapsed().as_secs_f64();

        if elapsed > 0.0 && iterations > 0 {
            Ok(iterations as f64 / elapsed)
        } else {
            Ok(0.0)
        }
    }
}
