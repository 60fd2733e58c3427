//! Outbound lookup collaborators: the pricing service and the maps service.
//!
//! The car service only sees the [`PriceClient`] and [`MapsClient`] traits;
//! `prices` and `maps` hold the reqwest-backed implementations.

pub mod maps;
pub mod prices;

use async_trait::async_trait;
use thiserror::Error;

use crate::car::domain::Location;

pub use maps::HttpMapsClient;
pub use prices::HttpPriceClient;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{service} network error: {message}")]
    Network { service: &'static str, message: String },
    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} parse error: {message}")]
    Parse { service: &'static str, message: String },
}

impl ClientError {
    pub fn service(&self) -> &'static str {
        match self {
            ClientError::Network { service, .. }
            | ClientError::Status { service, .. }
            | ClientError::Parse { service, .. } => service,
        }
    }
}

/// Looks up the current price of a vehicle.
#[async_trait]
pub trait PriceClient: Send + Sync {
    /// Human readable price, e.g. `USD 12345.67`.
    async fn get_price(&self, vehicle_id: i64) -> Result<String, ClientError>;
}

/// Resolves coordinates to a street address.
#[async_trait]
pub trait MapsClient: Send + Sync {
    /// Returns the same coordinates with the address parts filled in.
    async fn get_address(&self, location: Location) -> Result<Location, ClientError>;
}

/// Canned clients for tests, doc examples and benches.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers `"{currency} {price:.2}"` for every id and counts calls.
    pub struct FixedPriceClient {
        pub currency: String,
        pub price: f64,
        calls: AtomicUsize,
    }

    impl FixedPriceClient {
        pub fn new(currency: &str, price: f64) -> Self {
            Self { currency: currency.to_string(), price, calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl PriceClient for FixedPriceClient {
        async fn get_price(&self, _vehicle_id: i64) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(prices::format_price(&self.currency, self.price))
        }
    }

    /// Fills every location with the same address and counts calls.
    pub struct FixedMapsClient {
        pub address: String,
        pub city: String,
        pub state: String,
        pub zip: String,
        calls: AtomicUsize,
    }

    impl FixedMapsClient {
        pub fn new(address: &str, city: &str, state: &str, zip: &str) -> Self {
            Self {
                address: address.to_string(),
                city: city.to_string(),
                state: state.to_string(),
                zip: zip.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
    }

    impl Default for FixedMapsClient {
        fn default() -> Self { Self::new("777 Brockton Avenue", "Abington", "MA", "2351") }
    }

    #[async_trait]
    impl MapsClient for FixedMapsClient {
        async fn get_address(&self, location: Location) -> Result<Location, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Location {
                address: Some(self.address.clone()),
                city: Some(self.city.clone()),
                state: Some(self.state.clone()),
                zip: Some(self.zip.clone()),
                ..location.coordinates_only()
            })
        }
    }

    /// Always fails as if the remote service were down.
    #[derive(Default)]
    pub struct UnreachableClient;

    #[async_trait]
    impl PriceClient for UnreachableClient {
        async fn get_price(&self, _vehicle_id: i64) -> Result<String, ClientError> {
            Err(ClientError::Network { service: prices::SERVICE, message: "connection refused".into() })
        }
    }

    #[async_trait]
    impl MapsClient for UnreachableClient {
        async fn get_address(&self, _location: Location) -> Result<Location, ClientError> {
            Err(ClientError::Network { service: maps::SERVICE, message: "connection refused".into() })
        }
    }
}
