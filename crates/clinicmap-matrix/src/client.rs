//! HTTP client for the Google Distance Matrix API.
//!
//! Wraps `reqwest` with API key handling and typed response decoding. The
//! top-level `"status"` field is checked on every response and non-`OK`
//! values surface as [`MatrixError::ApiStatus`].

use std::time::Duration;

use clinicmap_core::UnitSystem;
use reqwest::{Client, Url};

use crate::error::MatrixError;
use crate::types::DistanceMatrixResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const MATRIX_PATH: &str = "maps/api/distancematrix/json";
const TRAVEL_MODE: &str = "driving";

/// Client for the Distance Matrix endpoint.
///
/// Use [`DistanceMatrixClient::new`] for production or
/// [`DistanceMatrixClient::with_base_url`] to point at a mock server in tests.
pub struct DistanceMatrixClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl DistanceMatrixClient {
    /// Creates a new client pointed at the production Google Maps API.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, MatrixError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MatrixError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MatrixError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so the join appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(MATRIX_PATH))
            .map_err(|e| MatrixError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Requests driving distances from one origin to up to 25 destinations.
    ///
    /// Element-level statuses (`ZERO_RESULTS`, `NOT_FOUND`) are left in the
    /// response for the caller to interpret.
    ///
    /// # Errors
    ///
    /// - [`MatrixError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MatrixError::Deserialize`] if the body is not the expected JSON.
    /// - [`MatrixError::ApiStatus`] if the top-level status is not `OK`.
    pub async fn get_matrix(
        &self,
        origin: &str,
        destinations: &[&str],
        units: UnitSystem,
    ) -> Result<DistanceMatrixResponse, MatrixError> {
        let url = self.build_url(origin, destinations, units);
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        // The request URL carries the API key, so it is kept out of error context.
        let parsed: DistanceMatrixResponse =
            serde_json::from_str(&body).map_err(|e| MatrixError::Deserialize {
                context: format!(
                    "distancematrix(origin={origin}, destinations={})",
                    destinations.len()
                ),
                source: e,
            })?;

        Self::check_api_status(parsed)
    }

    /// Builds the request URL with percent-encoded query parameters.
    /// Destinations are pipe-separated as the API expects.
    fn build_url(&self, origin: &str, destinations: &[&str], units: UnitSystem) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origins", origin)
            .append_pair("destinations", &destinations.join("|"))
            .append_pair("mode", TRAVEL_MODE)
            .append_pair("units", units.as_str())
            .append_pair("key", &self.api_key);
        url
    }

    fn check_api_status(
        response: DistanceMatrixResponse,
    ) -> Result<DistanceMatrixResponse, MatrixError> {
        if response.status == "OK" {
            Ok(response)
        } else {
            Err(MatrixError::ApiStatus {
                status: response.status,
                message: response.error_message,
            })
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
