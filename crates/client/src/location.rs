//! Best-effort geolocation reporting.
//!
//! On start the last known position is reused if it is still inside the cache
//! window; otherwise the platform is asked for a fresh one. Either way the
//! position is reported to the backend. Nothing here can block searching.

use std::sync::Arc;

use async_trait::async_trait;
use coursefind_core::cache::is_fresh;
use coursefind_core::{Clock, KvStore, LocationRecord};

use crate::api::SearchClient;

pub const LOCATION_KEY: &str = "user_location";
pub const LEGACY_LATITUDE_KEY: &str = "user_latitude";
pub const LEGACY_LONGITUDE_KEY: &str = "user_longitude";

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why the platform could not provide a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("User denied the request for Geolocation.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    PositionUnavailable,

    #[error("The request to get user location timed out.")]
    Timeout,

    #[error("An unknown error occurred.")]
    Unknown,

    #[error("Geolocation is not supported by this platform.")]
    Unsupported,
}

/// Platform geolocation service.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Provider with a fixed answer, for platforms without geolocation.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<Position>);

#[async_trait]
impl GeoProvider for FixedPosition {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        self.0.ok_or(GeolocationError::Unsupported)
    }
}

/// Result of a location refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    /// A still-valid stored position was reported; the user was not asked.
    ReportedCached(Position),
    /// A fresh position was obtained, stored and reported.
    ReportedFresh(Position),
    /// No position could be obtained.
    Unavailable(GeolocationError),
}

impl LocationStatus {
    /// Inline status text, if the user should see one.
    pub fn message(&self) -> Option<String> {
        match self {
            LocationStatus::Unavailable(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

/// Keeps the backend informed of the user's position.
pub struct LocationReporter {
    client: SearchClient,
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    provider: Arc<dyn GeoProvider>,
}

impl LocationReporter {
    pub fn new(
        client: SearchClient, store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, provider: Arc<dyn GeoProvider>,
    ) -> Self {
        Self { client, store, clock, provider }
    }

    /// Report a stored position, or obtain and report a fresh one.
    pub async fn initialize(&self) -> LocationStatus {
        if let Some(position) = self.cached_position().await {
            self.report(position).await;
            return LocationStatus::ReportedCached(position);
        }

        match self.provider.current_position().await {
            Ok(position) => {
                self.persist(position).await;
                self.report(position).await;
                LocationStatus::ReportedFresh(position)
            }
            Err(e) => {
                tracing::info!("geolocation unavailable: {}", e);
                LocationStatus::Unavailable(e)
            }
        }
    }

    /// The stored position if it is inside the cache window.
    ///
    /// Expired, unreadable and legacy (timestamp-less) records are removed.
    pub async fn cached_position(&self) -> Option<Position> {
        self.drop_legacy_keys().await;

        let raw = match self.store.get(LOCATION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("error reading location cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<LocationRecord>(&raw) {
            Ok(record) if is_fresh(record.timestamp, self.clock.now_millis()) => {
                tracing::debug!("using cached location");
                return Some(Position { latitude: record.latitude, longitude: record.longitude });
            }
            Ok(_) => tracing::debug!("location cache expired"),
            Err(e) => tracing::warn!("error reading location cache: {}", e),
        }

        if let Err(e) = self.store.remove(LOCATION_KEY).await {
            tracing::warn!("failed to remove location cache: {}", e);
        }
        None
    }

    async fn drop_legacy_keys(&self) {
        for key in [LEGACY_LATITUDE_KEY, LEGACY_LONGITUDE_KEY] {
            if let Ok(Some(_)) = self.store.get(key).await {
                tracing::debug!(key, "removing legacy location key");
                if let Err(e) = self.store.remove(key).await {
                    tracing::warn!(key, "failed to remove legacy location key: {}", e);
                }
            }
        }
    }

    async fn persist(&self, position: Position) {
        let record = LocationRecord {
            latitude: position.latitude,
            longitude: position.longitude,
            timestamp: self.clock.now_millis(),
        };
        let result = match serde_json::to_string(&record) {
            Ok(json) => self.store.set(LOCATION_KEY, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!("failed to store location: {}", e);
        }
    }

    async fn report(&self, position: Position) {
        match self.client.save_location(position.latitude, position.longitude).await {
            Ok(()) => tracing::debug!("location saved"),
            Err(e) => tracing::warn!("error saving location: {}", e),
        }
    }
}
