//! # Widget View State
//!
//! [`WidgetView`] is the single context object holding everything the widget
//! displays: the coordinate text, the status line, the radius input and the
//! overlay geometry. It is constructed once at startup and mutated only by the
//! event loop through the controller, so no synchronisation is involved.

use crate::config::Config;
use crate::messages;
use crate::projection::ProjectedCircle;
use crate::PositionReading;
use tracing::debug;

/// Visual style of the status line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusStyle {
    /// Transient, unstyled acknowledgement
    Neutral,
    Success,
    Error,
}

/// Where the most recent location request stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Requesting,
    Success,
    Failed,
    Unsupported,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub style: StatusStyle,
}

/// The circular overlay drawn over the map
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub width_px: f64,
    pub height_px: f64,
    /// Accessibility description
    pub label: String,
}

/// Minimum-bounded numeric radius input, holding the raw text as typed
#[derive(Clone, Debug, PartialEq)]
pub struct RadiusInput {
    pub value: String,
    pub min: f64,
}

impl RadiusInput {
    pub fn new(initial_meters: f64, min_meters: f64) -> Self {
        Self {
            value: messages::number_text(initial_meters),
            min: min_meters,
        }
    }

    /// Current value in meters, if the text parses as a number.
    pub fn parsed(&self) -> Option<f64> {
        parse_radius(&self.value)
    }
}

/// Parse radius text the way a numeric input does: surrounding whitespace is
/// ignored, and NaN or infinite text (`inf`, `1e400`) is never a value.
pub fn parse_radius(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Everything the widget shows.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetView {
    pub latitude: String,
    pub longitude: String,
    pub accuracy: String,
    pub status: StatusLine,
    pub phase: RequestPhase,
    pub radius_input: RadiusInput,
    pub overlay: Overlay,
    /// Laid-out width of the map surface; 0 until laid out
    pub map_width_px: f64,
    pub map_height_px: f64,
}

impl WidgetView {
    pub fn new(map_width_px: f64, map_height_px: f64, radius_input: RadiusInput) -> Self {
        Self {
            latitude: messages::LATITUDE_PENDING.to_string(),
            longitude: messages::LONGITUDE_PENDING.to_string(),
            accuracy: messages::ACCURACY_PENDING.to_string(),
            status: StatusLine {
                text: messages::STATUS_IDLE.to_string(),
                style: StatusStyle::Neutral,
            },
            phase: RequestPhase::Idle,
            radius_input,
            overlay: Overlay {
                width_px: 0.0,
                height_px: 0.0,
                label: String::new(),
            },
            map_width_px,
            map_height_px,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.map.width_px as f64,
            config.map.height_px as f64,
            RadiusInput::new(config.radius.initial_meters, config.radius.min_meters),
        )
    }

    /// Replace the status text with a success- or error-styled message.
    pub fn update_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status = StatusLine {
            text: message.into(),
            style: if is_error {
                StatusStyle::Error
            } else {
                StatusStyle::Success
            },
        };
    }

    /// Unstyled feedback shown the instant the trigger button is pressed.
    pub fn acknowledge_click(&mut self) {
        self.status = StatusLine {
            text: messages::STATUS_CLICK_ACKNOWLEDGED.to_string(),
            style: StatusStyle::Neutral,
        };
    }

    /// Project `radius_meters` onto the map and apply it to the overlay.
    pub fn apply_radius(&mut self, radius_meters: f64) -> ProjectedCircle {
        let circle = ProjectedCircle::new(radius_meters, self.map_width_px);
        self.overlay = Overlay {
            width_px: circle.pixel_diameter,
            height_px: circle.pixel_diameter,
            label: messages::overlay_label(circle.radius_meters),
        };
        debug!(
            radius_m = circle.radius_meters,
            diameter_px = circle.pixel_diameter,
            "overlay projected"
        );
        circle
    }

    /// Re-project with whatever the radius input currently holds; an
    /// unparsable input leaves the overlay as it is.
    pub fn refresh_overlay(&mut self) -> Option<ProjectedCircle> {
        let radius = self.radius_input.parsed()?;
        Some(self.apply_radius(radius))
    }

    pub fn show_reading(&mut self, reading: &PositionReading) {
        self.latitude = messages::latitude_text(reading);
        self.longitude = messages::longitude_text(reading);
        self.accuracy = messages::accuracy_text(reading);
    }

    pub fn show_failed_placeholders(&mut self) {
        self.latitude = messages::LATITUDE_FAILED.to_string();
        self.longitude = messages::LONGITUDE_FAILED.to_string();
        self.accuracy = messages::ACCURACY_NONE.to_string();
    }

    pub fn show_unsupported_placeholders(&mut self) {
        self.latitude = messages::LATITUDE_UNSUPPORTED.to_string();
        self.longitude = messages::LONGITUDE_UNSUPPORTED.to_string();
        self.accuracy = messages::ACCURACY_NONE.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> WidgetView {
        WidgetView::new(200.0, 200.0, RadiusInput::new(100.0, 10.0))
    }

    #[test]
    fn new_view_is_idle_with_empty_overlay() {
        let view = view();
        assert_eq!(view.phase, RequestPhase::Idle);
        assert_eq!(view.status.text, messages::STATUS_IDLE);
        assert_eq!(view.overlay.width_px, 0.0);
        assert_eq!(view.radius_input.value, "100");
    }

    #[test]
    fn apply_radius_sets_square_overlay_and_label() {
        let mut view = view();
        view.apply_radius(250.0);
        assert_eq!(view.overlay.width_px, 100.0);
        assert_eq!(view.overlay.height_px, 100.0);
        assert_eq!(view.overlay.label, "Radius indicator, radius 250 meters");
    }

    #[test]
    fn label_embeds_clamped_radius_not_pixels() {
        let mut view = view();
        view.apply_radius(-30.0);
        assert_eq!(view.overlay.width_px, 0.0);
        assert_eq!(view.overlay.label, "Radius indicator, radius 0 meters");

        view.apply_radius(5_000.0);
        assert_eq!(view.overlay.width_px, 200.0);
        assert_eq!(view.overlay.label, "Radius indicator, radius 5000 meters");
    }

    #[test]
    fn negative_zero_radius_reads_as_zero() {
        let mut view = WidgetView::new(200.0, 200.0, RadiusInput::new(-0.0, -0.0));
        assert_eq!(view.radius_input.value, "0");

        view.apply_radius(-0.0);
        assert_eq!(view.overlay.width_px, 0.0);
        assert_eq!(view.overlay.label, "Radius indicator, radius 0 meters");
    }

    #[test]
    fn refresh_skips_unparsable_input() {
        let mut view = view();
        view.apply_radius(50.0);
        let before = view.overlay.clone();

        view.radius_input.value = "abc".to_string();
        assert!(view.refresh_overlay().is_none());
        assert_eq!(view.overlay, before);
    }

    #[test]
    fn parse_radius_rejects_nan_and_text() {
        assert_eq!(parse_radius(" 42.5 "), Some(42.5));
        assert_eq!(parse_radius("NaN"), None);
        assert_eq!(parse_radius("inf"), None);
        assert_eq!(parse_radius("-infinity"), None);
        assert_eq!(parse_radius("1e400"), None);
        assert_eq!(parse_radius(""), None);
        assert_eq!(parse_radius("ten"), None);
    }

    #[test]
    fn status_styles() {
        let mut view = view();
        view.update_status("ok", false);
        assert_eq!(view.status.style, StatusStyle::Success);
        view.update_status("bad", true);
        assert_eq!(view.status.style, StatusStyle::Error);
        view.acknowledge_click();
        assert_eq!(view.status.style, StatusStyle::Neutral);
    }
}
