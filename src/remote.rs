//! Remote-mode resolution against the vendor's geolocation service.
//!
//! The service answers an HTTP GET with a small XML document, encoded in
//! windows-1251. A populated `message` element signals "no data for this
//! address" and maps to an empty result, not an error; transport failures
//! surface to the caller without retries.

use std::sync::Arc;

use encoding_rs::WINDOWS_1251;
use serde::Deserialize;

use crate::config::XML_URL;
use crate::error_handling::ResolveError;
use crate::models::Location;

/// Client for the remote geolocation endpoint.
pub struct RemoteClient {
    client: Arc<reqwest::Client>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IpAnswer {
    ip: Option<IpElement>,
}

#[derive(Debug, Deserialize)]
struct IpElement {
    message: Option<String>,
    country: Option<String>,
    city: Option<String>,
    region: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl RemoteClient {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self::with_base_url(client, XML_URL)
    }

    /// Uses a non-default endpoint; tests point this at a stub server.
    pub fn with_base_url(client: Arc<reqwest::Client>, base_url: impl Into<String>) -> Self {
        RemoteClient {
            client,
            base_url: base_url.into(),
        }
    }

    /// Queries the service for one address.
    pub async fn locate(&self, ip: &str) -> Result<Option<Location>, ResolveError> {
        let url = format!("{}{}", self.base_url, ip);
        let raw = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_answer(&raw)
    }
}

/// Parses the service's XML answer.
///
/// Returns `Ok(None)` when the answer carries a `message` element or no
/// usable country; the parsed response object is what decides "no match",
/// not the request.
fn parse_answer(raw: &[u8]) -> Result<Option<Location>, ResolveError> {
    let (text, _, _) = WINDOWS_1251.decode(raw);
    let answer: IpAnswer = quick_xml::de::from_str(&text)
        .map_err(|e| ResolveError::RemoteResponse(e.to_string()))?;

    let Some(ip) = answer.ip else {
        return Ok(None);
    };
    if ip.message.is_some() {
        return Ok(None);
    }
    let Some(country) = ip.country else {
        return Ok(None);
    };
    Ok(Some(Location {
        country,
        city: ip.city,
        region: ip.region,
        lat: ip.lat,
        lng: ip.lng,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_answer() {
        let xml = br#"<?xml version="1.0" encoding="windows-1251"?>
<ip-answer>
  <ip value="144.206.192.6">
    <inetnum>144.206.0.0 - 144.206.255.255</inetnum>
    <country>RU</country>
    <city>Moscow</city>
    <region>Moscow</region>
    <lat>55.755787</lat>
    <lng>37.617634</lng>
  </ip>
</ip-answer>"#;
        let location = parse_answer(xml).expect("parse").expect("match");
        assert_eq!(location.country, "RU");
        assert_eq!(location.city.as_deref(), Some("Moscow"));
        assert_eq!(location.region.as_deref(), Some("Moscow"));
        assert_eq!(location.lat, Some(55.755787));
        assert_eq!(location.lng, Some(37.617634));
    }

    #[test]
    fn message_element_means_no_match() {
        let xml = br#"<ip-answer><ip value="127.0.0.1"><message>Not applicable.</message></ip></ip-answer>"#;
        assert_eq!(parse_answer(xml).expect("parse"), None);
    }

    #[test]
    fn country_only_answer_has_empty_optionals() {
        let xml = br#"<ip-answer><ip value="8.8.8.8"><country>US</country></ip></ip-answer>"#;
        let location = parse_answer(xml).expect("parse").expect("match");
        assert_eq!(location.country, "US");
        assert_eq!(location.city, None);
        assert_eq!(location.region, None);
        assert_eq!(location.lat, None);
        assert_eq!(location.lng, None);
    }

    #[test]
    fn missing_ip_element_means_no_match() {
        let xml = br#"<ip-answer></ip-answer>"#;
        assert_eq!(parse_answer(xml).expect("parse"), None);
    }

    #[test]
    fn windows_1251_body_is_transcoded() {
        // "Москва" in windows-1251 inside the city and region elements.
        let moscow = [0xCC, 0xEE, 0xF1, 0xEA, 0xE2, 0xE0];
        let mut xml = Vec::new();
        xml.extend_from_slice(b"<ip-answer><ip value=\"1.2.3.4\"><country>RU</country><city>");
        xml.extend_from_slice(&moscow);
        xml.extend_from_slice(b"</city><region>");
        xml.extend_from_slice(&moscow);
        xml.extend_from_slice(b"</region></ip></ip-answer>");

        let location = parse_answer(&xml).expect("parse").expect("match");
        assert_eq!(location.city.as_deref(), Some("Москва"));
        assert_eq!(location.region.as_deref(), Some("Москва"));
    }

    #[test]
    fn garbage_answer_is_a_parse_failure() {
        let err = parse_answer(b"not xml at all <<<").unwrap_err();
        assert!(matches!(err, ResolveError::RemoteResponse(_)));
    }
}
