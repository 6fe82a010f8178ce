use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::types::{Colorbar, GeocodingLocation, NearestCity, PointValue};
use crate::api::ApiError;
use crate::catalog::store::ClimateCatalog;
use crate::core::entry::CatalogEntryResource;
use crate::core::types::Month;
use crate::utils::validation::{validate_coordinates, validate_data_type};

/// Default backend location
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default number of geocoding suggestions
pub const DEFAULT_GEOCODE_LIMIT: usize = 10;

/// Queries shorter than this return no suggestions without a request
pub const MIN_GEOCODE_QUERY_LEN: usize = 2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the climate maps backend.
///
/// Every call is a single request with no retries; callers decide how to
/// surface failures.
#[derive(Debug, Clone)]
pub struct ClimateApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ClimateApiClient {
    /// Create a client for `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client that reuses an existing `reqwest::Client`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or cannot carry a path.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, keeping any base path
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch the layer catalog from `GET /climatemap`.
    ///
    /// Malformed entries are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array.
    pub async fn fetch_catalog(&self) -> Result<ClimateCatalog, ApiError> {
        let url = self.endpoint(&["climatemap"])?;
        let resources: Vec<CatalogEntryResource> = self.get_json(url).await?;
        Ok(ClimateCatalog::from_resources(resources))
    }

    /// Layer value at a coordinate for one month
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn point_value(
        &self,
        data_type: &str,
        month: Month,
        lat: f64,
        lon: f64,
    ) -> Result<PointValue, ApiError> {
        validate_data_type(data_type)?;
        validate_coordinates(lat, lon)?;
        let mut url = self.endpoint(&["value", data_type, &month.to_string()])?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string());
        self.get_json(url).await
    }

    /// Closest named place to a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn nearest_city(&self, lat: f64, lon: f64) -> Result<NearestCity, ApiError> {
        validate_coordinates(lat, lon)?;
        let mut url = self.endpoint(&["nearest-city"])?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string());
        self.get_json(url).await
    }

    /// Place suggestions for a search string.
    ///
    /// Queries shorter than two characters return no suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodingLocation>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_GEOCODE_QUERY_LEN {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint(&["geocode"])?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    /// Legend for a layer
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn colorbar(&self, data_type: &str) -> Result<Colorbar, ApiError> {
        validate_data_type(data_type)?;
        let url = self.endpoint(&["colorbar", data_type])?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ClimateApiClient::new("https://example.org/api/").unwrap();
        let url = client.endpoint(&["value", "tmax_1970_2000_10m", "7"]).unwrap();
        assert_eq!(url.as_str(), "https://example.org/api/value/tmax_1970_2000_10m/7");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = ClimateApiClient::new(DEFAULT_API_URL).unwrap();
        let url = client.endpoint(&["colorbar", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/colorbar/a%2Fb");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClimateApiClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClimateApiClient::new("mailto:someone@example.org"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_input_skips_request() {
        let client = ClimateApiClient::new("http://127.0.0.1:9").unwrap();
        let month = Month::new(1).unwrap();
        assert!(matches!(
            client.point_value("../x", month, 0.0, 0.0).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            client.nearest_city(120.0, 0.0).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_short_geocode_query_skips_request() {
        // Port 9 is discard; a request would fail
        let client = ClimateApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.geocode(" a ", 10).await.unwrap().is_empty());
    }
}
