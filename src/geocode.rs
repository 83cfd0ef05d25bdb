use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{GetField, MissingField};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("geocoding service answered {status}: {message}")]
    Service { status: String, message: String },
    #[error("malformed geocoding response: {0}")]
    Malformed(#[from] MissingField),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the address matches nothing.
    async fn locate(&self, address: &str) -> Result<Option<LatLng>, GeocodeError>;
}

#[derive(Clone)]
pub struct GoogleGeocoder {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub const DEFAULT_URL: &'static str = "https://maps.googleapis.com/maps/api/geocode/json";

    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        let http_client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn locate(&self, address: &str) -> Result<Option<LatLng>, GeocodeError> {
        let body: Value = self.http_client.get(&self.url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_google_response(&body)
    }
}

fn parse_google_response(body: &Value) -> Result<Option<LatLng>, GeocodeError> {
    let status = body.get_str_field("status")?;
    match status.as_str() {
        "OK" => {
            let Some(first) = body.get_obj_field("results")?.get(0) else {
                return Ok(None);
            };
            let location = first.get_obj_field("geometry")?.get_obj_field("location")?;
            Ok(Some(LatLng {
                lat: location.get_f64_field("lat")?,
                lng: location.get_f64_field("lng")?,
            }))
        }
        "ZERO_RESULTS" => Ok(None),
        _ => Err(GeocodeError::Service {
            message: body.get_str_field("error_message").unwrap_or_default(),
            status,
        }),
    }
}

/// Answers from a fixed table, keyed case-insensitively on the trimmed address.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    places: HashMap<String, LatLng>,
}

impl FixedGeocoder {
    pub fn with(mut self, address: &str, lat: f64, lng: f64) -> Self {
        self.places.insert(normalize(address), LatLng { lat, lng });
        self
    }

    pub fn sample() -> Self {
        Self::default()
            .with("New York, NY", 40.7127753, -74.0059728)
            .with("San Francisco, CA", 37.7749295, -122.4194155)
            .with("Chicago, IL", 41.8781136, -87.6297982)
            .with("Austin, TX", 30.267153, -97.7430608)
            .with("Seattle, WA", 47.6062095, -122.3320708)
            .with("Boston, MA", 42.3600825, -71.0588801)
            .with("Denver, CO", 39.7392358, -104.990251)
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn locate(&self, address: &str) -> Result<Option<LatLng>, GeocodeError> {
        Ok(self.places.get(&normalize(address)).copied())
    }
}

fn normalize(address: &str) -> String {
    address
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
        .to_lowercase()
}
