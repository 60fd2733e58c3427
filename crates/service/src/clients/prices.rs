use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{ClientError, PriceClient};

pub const SERVICE: &str = "pricing";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    currency: String,
    price: f64,
    #[serde(default)]
    vehicle_id: Option<i64>,
}

pub fn format_price(currency: &str, price: f64) -> String {
    format!("{} {:.2}", currency, price)
}

/// Pricing service client: `GET {base_url}/services/price?vehicleId={id}`.
pub struct HttpPriceClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPriceClient {
    pub fn new(cfg: &configs::LookupConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network { service: SERVICE, message: e.to_string() })?;
        Ok(Self { base_url: cfg.base_url.trim_end_matches('/').to_string(), client })
    }
}

#[async_trait]
impl PriceClient for HttpPriceClient {
    #[instrument(skip(self))]
    async fn get_price(&self, vehicle_id: i64) -> Result<String, ClientError> {
        let url = format!("{}/services/price", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("vehicleId", vehicle_id)])
            .send()
            .await
            .map_err(|e| ClientError::Network { service: SERVICE, message: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, vehicle_id, "price lookup rejected");
            return Err(ClientError::Status { service: SERVICE, status: status.as_u16() });
        }

        let body: PriceResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse { service: SERVICE, message: e.to_string() })?;
        debug!(vehicle_id, answered_for = ?body.vehicle_id, currency = %body.currency, "price resolved");
        Ok(format_price(&body.currency, body.price))
    }
}
