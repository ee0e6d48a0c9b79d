//! # Location Capability
//!
//! This module defines the seam between the widget and whatever actually knows
//! where the device is. The controller only ever talks to the
//! [`LocationCapability`] trait, which resolves a single request to exactly one
//! `Result<PositionReading, AcquisitionFailure>`.
//!
//! ## Sources
//!
//! - **Fixed**: yields a configured reading, useful on stationary hardware and in
//!   development
//! - **HTTP**: asks a JSON geolocation endpoint for the current position
//! - **None**: no capability at all; [`PlatformLocator::from_config`] returns
//!   `None` and the controller reports the widget as unsupported
//!
//! ## Failure Taxonomy
//!
//! Failures use the platform's numeric convention so that foreign error codes
//! can be mapped in with [`AcquisitionFailure::from_code`]:
//!
//! | Code | Variant |
//! |------|---------|
//! | 1 | [`AcquisitionFailure::PermissionDenied`] |
//! | 2 | [`AcquisitionFailure::PositionUnavailable`] |
//! | 3 | [`AcquisitionFailure::Timeout`] |
//! | other | [`AcquisitionFailure::Unknown`] |
//!
//! Nothing here retries or caches. Every call performs one fresh attempt.

use crate::config::{LocationConfig, LocationSource};
use crate::PositionReading;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Outcome of a single location request.
///
/// Produced by the capability and consumed exactly once by the controller to
/// pick a user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcquisitionFailure {
    /// The user or platform refused access to the location
    #[error("permission denied")]
    PermissionDenied,

    /// No position could be determined right now
    #[error("position unavailable")]
    PositionUnavailable,

    /// No reading arrived before the request deadline
    #[error("timed out")]
    Timeout,

    /// Anything outside the known taxonomy, with the raw code and message
    #[error("unknown error ({code}): {message}")]
    Unknown { code: u16, message: String },
}

impl AcquisitionFailure {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    /// Build a failure from a platform error code and message.
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            Self::PERMISSION_DENIED => Self::PermissionDenied,
            Self::POSITION_UNAVAILABLE => Self::PositionUnavailable,
            Self::TIMEOUT => Self::Timeout,
            _ => Self::Unknown {
                code,
                message: message.into(),
            },
        }
    }

    /// Platform error code for this failure.
    pub fn code(&self) -> u16 {
        match self {
            Self::PermissionDenied => Self::PERMISSION_DENIED,
            Self::PositionUnavailable => Self::POSITION_UNAVAILABLE,
            Self::Timeout => Self::TIMEOUT,
            Self::Unknown { code, .. } => *code,
        }
    }
}

/// Request parameters handed to the capability on every acquisition.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PositionOptions {
    /// Ask for the best precision the source can offer
    pub high_accuracy: bool,
    /// Give up after this many milliseconds
    pub timeout_ms: u64,
    /// Oldest acceptable cached reading; 0 forces a fresh fix
    pub maximum_age_ms: u64,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 15_000,
            maximum_age_ms: 0,
        }
    }
}

impl PositionOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Something that can produce a one-shot position reading.
///
/// Implementations must resolve each call exactly once, with either a reading
/// or a failure, and must not block the calling thread while waiting.
pub trait LocationCapability: Send + Sync {
    fn locate(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionReading, AcquisitionFailure>> + Send;
}

/// Errors raised while building a capability from configuration.
#[derive(Error, Debug)]
pub enum LocatorError {
    /// `source = "http"` without an `endpoint`
    #[error("http location source requires an endpoint")]
    MissingEndpoint,

    /// The HTTP client could not be constructed
    #[error("HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Yields a configured reading after an optional simulated fix delay.
#[derive(Clone, Debug)]
pub struct FixedLocator {
    reading: PositionReading,
    fix_delay: Duration,
}

impl FixedLocator {
    pub fn new(reading: PositionReading) -> Self {
        Self {
            reading,
            fix_delay: Duration::ZERO,
        }
    }

    /// Delay before the reading becomes available; a delay beyond the request
    /// timeout surfaces as [`AcquisitionFailure::Timeout`].
    pub fn with_fix_delay(mut self, fix_delay: Duration) -> Self {
        self.fix_delay = fix_delay;
        self
    }
}

impl LocationCapability for FixedLocator {
    async fn locate(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionReading, AcquisitionFailure> {
        if !self.reading.is_plausible() {
            warn!(reading = ?self.reading, "configured position is out of range");
            return Err(AcquisitionFailure::PositionUnavailable);
        }

        tokio::time::timeout(options.timeout(), tokio::time::sleep(self.fix_delay))
            .await
            .map_err(|_| AcquisitionFailure::Timeout)?;

        debug!(
            latitude = self.reading.latitude,
            longitude = self.reading.longitude,
            "fixed position delivered"
        );
        Ok(self.reading)
    }
}

/// Asks a JSON geolocation endpoint for the current position.
///
/// Expected body: `{"latitude": 25.03, "longitude": 121.56, "accuracy": 20}`
/// (`lat`/`lon`/`lng` are accepted as aliases).
#[derive(Clone, Debug)]
pub struct HttpLocator {
    client: Client,
    endpoint: String,
}

impl HttpLocator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LocatorError> {
        let client = Client::builder()
            .user_agent(concat!("radius-locator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn fetch(&self, options: &PositionOptions) -> Result<PositionReading, AcquisitionFailure> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .timeout(options.timeout())
            .query(&[("high_accuracy", options.high_accuracy)]);

        if options.maximum_age_ms == 0 {
            request = request.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        if let Some(failure) = classify_status(response.status()) {
            return Err(failure);
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        parse_reading(&body)
    }
}

impl LocationCapability for HttpLocator {
    async fn locate(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionReading, AcquisitionFailure> {
        debug!(endpoint = %self.endpoint, timeout_ms = options.timeout_ms, "requesting position");

        // The client timeout covers the request; this also bounds body streaming.
        let outcome = tokio::time::timeout(options.timeout(), self.fetch(options))
            .await
            .unwrap_or(Err(AcquisitionFailure::Timeout));

        if let Err(failure) = &outcome {
            warn!(endpoint = %self.endpoint, %failure, "position request failed");
        }
        outcome
    }
}

/// The capability selected by configuration.
#[derive(Clone, Debug)]
pub enum PlatformLocator {
    Fixed(FixedLocator),
    Http(HttpLocator),
}

impl PlatformLocator {
    /// Build the configured capability, or `None` when the configuration says
    /// the platform has no location support.
    pub fn from_config(config: &LocationConfig) -> Result<Option<Self>, LocatorError> {
        match config.source {
            LocationSource::None => Ok(None),
            LocationSource::Fixed => {
                let reading = PositionReading {
                    latitude: config.latitude,
                    longitude: config.longitude,
                    accuracy: config.accuracy_m,
                };
                let locator = FixedLocator::new(reading)
                    .with_fix_delay(Duration::from_millis(config.fix_delay_ms));
                Ok(Some(Self::Fixed(locator)))
            }
            LocationSource::Http => {
                let endpoint = config
                    .endpoint
                    .as_deref()
                    .ok_or(LocatorError::MissingEndpoint)?;
                Ok(Some(Self::Http(HttpLocator::new(endpoint)?)))
            }
        }
    }
}

impl LocationCapability for PlatformLocator {
    async fn locate(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionReading, AcquisitionFailure> {
        match self {
            Self::Fixed(locator) => locator.locate(options).await,
            Self::Http(locator) => locator.locate(options).await,
        }
    }
}

/// Map a non-success HTTP status onto the failure taxonomy.
///
/// Returns `None` for 2xx statuses.
pub fn classify_status(status: StatusCode) -> Option<AcquisitionFailure> {
    if status.is_success() {
        return None;
    }

    let failure = match status.as_u16() {
        401 | 403 => AcquisitionFailure::PermissionDenied,
        408 | 504 => AcquisitionFailure::Timeout,
        500..=599 => AcquisitionFailure::PositionUnavailable,
        code => AcquisitionFailure::Unknown {
            code,
            message: status
                .canonical_reason()
                .unwrap_or("unexpected HTTP status")
                .to_string(),
        },
    };
    Some(failure)
}

fn classify_transport_error(error: reqwest::Error) -> AcquisitionFailure {
    if error.is_timeout() {
        AcquisitionFailure::Timeout
    } else if error.is_connect() {
        AcquisitionFailure::PositionUnavailable
    } else {
        AcquisitionFailure::Unknown {
            code: error.status().map(|s| s.as_u16()).unwrap_or(0),
            message: error.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct GeolocationBody {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
    accuracy: f64,
}

/// Parse a geolocation response body into a reading.
///
/// Malformed JSON is an unknown failure; well-formed but implausible values
/// mean the service had no usable position.
pub fn parse_reading(body: &str) -> Result<PositionReading, AcquisitionFailure> {
    let parsed: GeolocationBody =
        serde_json::from_str(body).map_err(|e| AcquisitionFailure::Unknown {
            code: 0,
            message: format!("malformed response: {}", e),
        })?;

    let reading = PositionReading {
        latitude: parsed.latitude,
        longitude: parsed.longitude,
        accuracy: parsed.accuracy,
    };

    if reading.is_plausible() {
        Ok(reading)
    } else {
        Err(AcquisitionFailure::PositionUnavailable)
    }
}
