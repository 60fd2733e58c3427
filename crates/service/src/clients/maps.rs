use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{ClientError, MapsClient};
use crate::car::domain::Location;

pub const SERVICE: &str = "maps";

#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
}

/// Maps service client: `GET {base_url}/maps?lat={lat}&lon={lon}`.
pub struct HttpMapsClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMapsClient {
    pub fn new(cfg: &configs::LookupConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network { service: SERVICE, message: e.to_string() })?;
        Ok(Self { base_url: cfg.base_url.trim_end_matches('/').to_string(), client })
    }
}

#[async_trait]
impl MapsClient for HttpMapsClient {
    #[instrument(skip(self, location), fields(lat = location.lat, lon = location.lon))]
    async fn get_address(&self, location: Location) -> Result<Location, ClientError> {
        let url = format!("{}/maps", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("lat", location.lat), ("lon", location.lon)])
            .send()
            .await
            .map_err(|e| ClientError::Network { service: SERVICE, message: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "address lookup rejected");
            return Err(ClientError::Status { service: SERVICE, status: status.as_u16() });
        }

        let body: AddressResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse { service: SERVICE, message: e.to_string() })?;
        debug!(address = ?body.address, "address resolved");
        Ok(Location {
            address: body.address,
            city: body.city,
            state: body.state,
            zip: body.zip,
            ..location.coordinates_only()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    use crate::test_support::spawn_stub;

    #[tokio::test]
    async fn copies_address_onto_the_given_coordinates() {
        let app = Router::new().route(
            "/maps",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert!(q.contains_key("lat") && q.contains_key("lon"));
                Json(json!({
                    "address": "777 Brockton Avenue",
                    "city": "Abington",
                    "state": "MA",
                    "zip": "2351"
                }))
            }),
        );
        let base = spawn_stub(app).await;
        let client = HttpMapsClient::new(&configs::LookupConfig { base_url: base, timeout_secs: 2 }).unwrap();

        let mut input = Location::new(40.730610, -73.935242);
        input.address = Some("stale".into());
        let out = client.get_address(input).await.unwrap();
        assert_eq!(out.lat, 40.730610);
        assert_eq!(out.lon, -73.935242);
        assert_eq!(out.address.as_deref(), Some("777 Brockton Avenue"));
        assert_eq!(out.zip.as_deref(), Some("2351"));
    }

    #[tokio::test]
    async fn server_error_is_surfaced() {
        let app = Router::new().route("/maps", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = spawn_stub(app).await;
        let client = HttpMapsClient::new(&configs::LookupConfig { base_url: base, timeout_secs: 2 }).unwrap();

        let err = client.get_address(Location::new(0.0, 0.0)).await.unwrap_err();
        assert_eq!(err.service(), SERVICE);
        assert!(matches!(err, ClientError::Status { status: 503, .. }));
    }
}
