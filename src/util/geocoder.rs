//! Address → coordinates lookups against the MapQuest geocoding API.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::GeocoderConfig;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Could not geocode address: {0}")]
    NoResult(String),
    #[error("Geocoding request failed: {0}")]
    Transport(String),
    #[error("Geocoding service returned status {0}")]
    Status(u16),
}

/// Best match for an address
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct MapQuestResponse {
    #[serde(default)]
    results: Vec<MapQuestResult>,
}

#[derive(Debug, Deserialize)]
struct MapQuestResult {
    #[serde(default)]
    locations: Vec<MapQuestLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapQuestLocation {
    lat_lng: MapQuestLatLng,
    #[serde(default)]
    street: String,
    /// City
    #[serde(default)]
    admin_area5: String,
    /// State
    #[serde(default)]
    admin_area3: String,
    #[serde(default)]
    postal_code: String,
    /// Country code
    #[serde(default)]
    admin_area1: String,
}

#[derive(Debug, Deserialize)]
struct MapQuestLatLng {
    lat: f64,
    lng: f64,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl From<MapQuestLocation> for GeoLocation {
    fn from(loc: MapQuestLocation) -> Self {
        let street = non_empty(loc.street);
        let city = non_empty(loc.admin_area5);
        let state = non_empty(loc.admin_area3);
        let zipcode = non_empty(loc.postal_code);
        let country = non_empty(loc.admin_area1);

        let state_zip = [state.as_deref(), zipcode.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        let formatted_address = [street.as_deref(), city.as_deref(), Some(state_zip.as_str()), country.as_deref()]
            .iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        GeoLocation {
            lat: loc.lat_lng.lat,
            lng: loc.lat_lng.lng,
            formatted_address,
            street,
            city,
            state,
            zipcode,
            country,
        }
    }
}

pub struct MapQuestGeocoder {
    config: GeocoderConfig,
    client: reqwest::Client,
}

impl MapQuestGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        info!("MapQuest geocoder initialized for {}", config.base_url);
        Ok(MapQuestGeocoder { config, client })
    }
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
        debug!("Geocoding address");

        let res = self
            .client
            .get(self.config.address_endpoint())
            .query(&[("key", self.config.api_key.as_str()), ("location", address)])
            .send()
            .await
            .map_err(|e| {
                error!("Geocoding request failed: {}", e);
                GeocodeError::Transport(e.to_string())
            })?;

        if !res.status().is_success() {
            warn!("Geocoding service returned {}", res.status());
            return Err(GeocodeError::Status(res.status().as_u16()));
        }

        let body: MapQuestResponse = res
            .json()
            .await
            .map_err(|e| GeocodeError::Transport(format!("Malformed geocoding response: {}", e)))?;

        body.results
            .into_iter()
            .flat_map(|r| r.locations)
            .next()
            .map(GeoLocation::from)
            .ok_or_else(|| {
                warn!("No geocoding result");
                GeocodeError::NoResult(address.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_address_skips_missing_parts() {
        let loc = MapQuestLocation {
            lat_lng: MapQuestLatLng { lat: 42.35, lng: -71.06 },
            street: "233 Bay State Rd".to_string(),
            admin_area5: "Boston".to_string(),
            admin_area3: "MA".to_string(),
            postal_code: "02215".to_string(),
            admin_area1: "US".to_string(),
        };
        let geo = GeoLocation::from(loc);
        assert_eq!(geo.formatted_address, "233 Bay State Rd, Boston, MA 02215, US");

        let loc = MapQuestLocation {
            lat_lng: MapQuestLatLng { lat: 0.0, lng: 0.0 },
            street: String::new(),
            admin_area5: "Boston".to_string(),
            admin_area3: String::new(),
            postal_code: String::new(),
            admin_area1: "US".to_string(),
        };
        let geo = GeoLocation::from(loc);
        assert_eq!(geo.formatted_address, "Boston, US");
        assert_eq!(geo.street, None);
    }
}
