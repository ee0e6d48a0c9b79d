//! # Radius Locator Core Library
//!
//! This library provides the data structures and logic behind the radius locator
//! widget: a one-shot "where am I" readout paired with a circular overlay whose
//! on-screen size is projected from a radius in meters onto a fixed-size map.
//!
//! ## Design Philosophy
//!
//! ### Transient Readings
//! - **No persistence**: a [`PositionReading`] is formatted into display text the
//!   moment it arrives and then dropped. Nothing is cached between requests.
//! - **One outcome per request**: every acquisition resolves to exactly one
//!   `Result<PositionReading, AcquisitionFailure>`.
//!
//! ### Explicit UI State
//! All mutable presentation state lives in a single [`view::WidgetView`] that is
//! built once at startup and handed to the controller by `&mut`. Only the event
//! loop owns it, so no locking is ever needed.
//!
//! ### Data Flow
//! 1. **Click**: [`controller::LocationController`] shows a status message and asks
//!    the [`location::LocationCapability`] for a reading
//! 2. **Outcome**: success fills the coordinate text, failure picks a message from
//!    the failure taxonomy and resets the coordinates to placeholders
//! 3. **Projection**: either way the overlay is re-projected with the current
//!    radius via [`projection::project`]
//! 4. **Render**: [`renderer`] draws the view to a terminal or a 1-bit frame
//!
//! ## Core Types
//!
//! - [`PositionReading`]: a single latitude/longitude/accuracy sample
//! - [`location::AcquisitionFailure`]: the tagged failure of a location request

use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod controller;
pub mod framebuffer;
pub mod location;
pub mod messages;
pub mod projection;
pub mod renderer;
pub mod view;

/// A single position sample delivered by the location capability.
///
/// Readings are ephemeral: the controller turns them into display text right
/// away and never keeps them around.
///
/// # Example
/// ```
/// use radius_locator_lib::PositionReading;
///
/// let reading = PositionReading { latitude: 25.033, longitude: 121.565, accuracy: 12.0 };
/// assert!(reading.is_plausible());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
    /// Accuracy radius in meters (non-negative)
    pub accuracy: f64,
}

impl PositionReading {
    /// True when the coordinates are finite and in range and the accuracy is a
    /// non-negative finite number of meters.
    pub fn is_plausible(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.accuracy.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.accuracy >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_reading_accepted() {
        let reading = PositionReading {
            latitude: -33.8688,
            longitude: 151.2093,
            accuracy: 0.0,
        };
        assert!(reading.is_plausible());
    }

    #[test]
    fn implausible_readings_rejected() {
        let base = PositionReading {
            latitude: 10.0,
            longitude: 10.0,
            accuracy: 5.0,
        };

        assert!(!PositionReading {
            latitude: 91.0,
            ..base
        }
        .is_plausible());
        assert!(!PositionReading {
            longitude: f64::NAN,
            ..base
        }
        .is_plausible());
        assert!(!PositionReading {
            accuracy: -1.0,
            ..base
        }
        .is_plausible());
    }
}
