//! # Meter-to-Pixel Radius Projection
//!
//! The map surface has a fixed conceptual span: its full pixel width always
//! represents [`MAP_SPAN_METERS`] meters, whatever size it is drawn at. A radius
//! in meters is therefore projected to an on-screen circle diameter by simple
//! proportion and then clamped so the circle never outgrows the surface.
//!
//! ```text
//! diameter_m  = max(0, radius_m) * 2
//! diameter_px = diameter_m * width_px / MAP_SPAN_METERS
//! diameter_px = clamp(diameter_px, 0, width_px)
//! ```
//!
//! Malformed input is sanitized rather than rejected: negative or NaN radii act
//! as zero, and a surface that has not been laid out yet (width 0) yields 0.

/// Meters represented by the full pixel width of the map surface.
pub const MAP_SPAN_METERS: f64 = 1000.0;

/// Radius actually used for projection and labelling.
///
/// Negative values (including `-0.0`) and NaN collapse to positive zero.
/// Positive infinity is kept so it can saturate the surface in [`project`].
pub fn effective_radius(radius_meters: f64) -> f64 {
    if radius_meters.is_nan() || radius_meters <= 0.0 {
        0.0
    } else {
        radius_meters
    }
}

/// Project a radius in meters to a circle diameter in pixels.
///
/// The result is always within `[0, map_pixel_width]` for a laid-out surface
/// and exactly 0 when the width is zero, negative or not finite.
///
/// # Example
/// ```
/// use radius_locator_lib::projection::project;
///
/// // A 500 m radius spans the whole 1000 m map.
/// assert_eq!(project(500.0, 1000.0), 1000.0);
/// // Oversized radii fill the surface and stop there.
/// assert_eq!(project(10_000.0, 500.0), 500.0);
/// // Negative radii are treated as zero.
/// assert_eq!(project(-20.0, 300.0), 0.0);
/// ```
pub fn project(radius_meters: f64, map_pixel_width: f64) -> f64 {
    let width = surface_width(map_pixel_width);
    if width == 0.0 {
        return 0.0;
    }

    let diameter_meters = effective_radius(radius_meters) * 2.0;
    let pixel_diameter = diameter_meters * width / MAP_SPAN_METERS;

    pixel_diameter.clamp(0.0, width)
}

/// Derived overlay geometry for one projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedCircle {
    /// Radius in meters after clamping (what the overlay label reports)
    pub radius_meters: f64,
    /// On-screen diameter in pixels
    pub pixel_diameter: f64,
}

impl ProjectedCircle {
    pub fn new(radius_meters: f64, map_pixel_width: f64) -> Self {
        Self {
            radius_meters: effective_radius(radius_meters),
            pixel_diameter: project(radius_meters, map_pixel_width),
        }
    }
}

fn surface_width(map_pixel_width: f64) -> f64 {
    if map_pixel_width.is_finite() && map_pixel_width > 0.0 {
        map_pixel_width
    } else {
        0.0
    }
}
