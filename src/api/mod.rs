//! Client for the climate maps backend API.
//!
//! - [`ClimateApiClient::fetch_catalog`]: `GET /climatemap`
//! - [`ClimateApiClient::point_value`]: `GET /value/{data_type}/{month}?lat&lon`
//! - [`ClimateApiClient::nearest_city`]: `GET /nearest-city?lat&lon`
//! - [`ClimateApiClient::geocode`]: `GET /geocode?query&limit`
//! - [`ClimateApiClient::colorbar`]: `GET /colorbar/{data_type}`

pub mod client;
pub mod types;

use thiserror::Error;

pub use client::{ClimateApiClient, DEFAULT_API_URL, DEFAULT_GEOCODE_LIMIT};
pub use types::{Colorbar, GeocodingLocation, NearestCity, PointValue};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Validation(#[from] crate::utils::validation::ValidationError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
