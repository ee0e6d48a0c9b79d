//! # Location Acquisition Controller
//!
//! Routes user interaction to the location capability and the overlay
//! projection. The controller never owns the view; every handler borrows the
//! [`WidgetView`] for the duration of one event.
//!
//! A request is split in two halves so an event loop can keep handling input
//! while the capability is busy:
//!
//! 1. [`LocationController::begin_request`] updates the status and hands back a
//!    `'static` future for the acquisition (or `None` when unsupported)
//! 2. [`LocationController::complete_request`] applies the outcome once the
//!    future resolves
//!
//! [`LocationController::request_location`] chains both for callers that are
//! happy to wait. Overlapping requests are not guarded against: each one runs
//! to completion and its outcome is applied when it arrives.

use crate::location::{AcquisitionFailure, LocationCapability, PositionOptions};
use crate::messages;
use crate::view::{parse_radius, RequestPhase, WidgetView};
use crate::PositionReading;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome delivered exactly once per acquisition
pub type Acquisition = Result<PositionReading, AcquisitionFailure>;

pub struct LocationController<C> {
    capability: Option<Arc<C>>,
    options: PositionOptions,
}

impl<C> LocationController<C>
where
    C: LocationCapability + 'static,
{
    /// `capability` is `None` when the platform has no location support.
    pub fn new(capability: Option<C>, options: PositionOptions) -> Self {
        Self {
            capability: capability.map(Arc::new),
            options,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_some()
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Page-ready hook: draw the overlay for the initial radius.
    pub fn initialize(&self, view: &mut WidgetView) {
        if view.refresh_overlay().is_none() {
            warn!(value = %view.radius_input.value, "initial radius is not a number");
        }
    }

    /// Radius input edit. Values below the minimum snap up to it; text that
    /// is not a number is kept as typed and the overlay is left alone.
    pub fn edit_radius(&self, view: &mut WidgetView, raw: &str) {
        view.radius_input.value = raw.to_string();

        let Some(radius) = parse_radius(raw) else {
            debug!(raw, "radius input is not a number, overlay unchanged");
            return;
        };

        let min = view.radius_input.min;
        if radius >= min {
            view.apply_radius(radius);
        } else {
            debug!(radius, min, "radius below minimum, snapping up");
            view.radius_input.value = messages::number_text(min);
            view.apply_radius(min);
        }
    }

    /// Trigger button: acknowledge the click, then start a request.
    pub fn press_button(
        &self,
        view: &mut WidgetView,
    ) -> Option<impl Future<Output = Acquisition> + Send + 'static> {
        view.acknowledge_click();
        self.begin_request(view)
    }

    /// Start a location request.
    ///
    /// Returns `None` when the platform has no capability, after switching the
    /// view to its unsupported state.
    pub fn begin_request(
        &self,
        view: &mut WidgetView,
    ) -> Option<impl Future<Output = Acquisition> + Send + 'static> {
        let Some(capability) = self.capability.clone() else {
            warn!("no location capability available");
            view.update_status(messages::STATUS_UNSUPPORTED, true);
            view.show_unsupported_placeholders();
            view.phase = RequestPhase::Unsupported;
            return None;
        };

        view.update_status(messages::STATUS_REQUESTING, false);
        view.phase = RequestPhase::Requesting;
        info!(
            high_accuracy = self.options.high_accuracy,
            timeout_ms = self.options.timeout_ms,
            maximum_age_ms = self.options.maximum_age_ms,
            "requesting location"
        );

        let options = self.options.clone();
        Some(async move { capability.locate(&options).await })
    }

    /// Apply the outcome of a request started with [`Self::begin_request`].
    pub fn complete_request(&self, view: &mut WidgetView, outcome: Acquisition) {
        match outcome {
            Ok(reading) => self.display_location(view, &reading),
            Err(failure) => self.handle_location_error(view, &failure),
        }
    }

    /// Request a location and wait for the outcome.
    pub async fn request_location(&self, view: &mut WidgetView) {
        if let Some(acquisition) = self.begin_request(view) {
            let outcome = acquisition.await;
            self.complete_request(view, outcome);
        }
    }

    /// Press the button and wait for the outcome.
    pub async fn click(&self, view: &mut WidgetView) {
        if let Some(acquisition) = self.press_button(view) {
            let outcome = acquisition.await;
            self.complete_request(view, outcome);
        }
    }

    fn display_location(&self, view: &mut WidgetView, reading: &PositionReading) {
        info!(
            latitude = reading.latitude,
            longitude = reading.longitude,
            accuracy_m = reading.accuracy,
            "location acquired"
        );
        view.show_reading(reading);
        view.update_status(messages::STATUS_SUCCESS, false);
        view.phase = RequestPhase::Success;
        view.refresh_overlay();
    }

    fn handle_location_error(&self, view: &mut WidgetView, failure: &AcquisitionFailure) {
        warn!(code = failure.code(), %failure, "location request failed");
        view.update_status(messages::failure_message(failure), true);
        view.show_failed_placeholders();
        view.phase = RequestPhase::Failed;
        // A failed fix must not freeze the overlay.
        view.refresh_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::FixedLocator;
    use crate::view::{RadiusInput, StatusStyle};

    fn view() -> WidgetView {
        WidgetView::new(200.0, 200.0, RadiusInput::new(100.0, 10.0))
    }

    fn controller() -> LocationController<FixedLocator> {
        let reading = PositionReading {
            latitude: 25.033,
            longitude: 121.565,
            accuracy: 12.0,
        };
        LocationController::new(Some(FixedLocator::new(reading)), PositionOptions::default())
    }

    #[test]
    fn initialize_projects_initial_radius() {
        let mut view = view();
        controller().initialize(&mut view);
        assert_eq!(view.overlay.width_px, 40.0);
    }

    #[test]
    fn edit_below_minimum_snaps_up() {
        let mut view = view();
        let controller = controller();
        controller.edit_radius(&mut view, "3");
        assert_eq!(view.radius_input.value, "10");
        assert_eq!(view.overlay.width_px, 4.0);
        assert_eq!(view.overlay.label, "Radius indicator, radius 10 meters");
    }

    #[test]
    fn edit_at_or_above_minimum_is_kept() {
        let mut view = view();
        let controller = controller();
        controller.edit_radius(&mut view, "10");
        assert_eq!(view.radius_input.value, "10");
        controller.edit_radius(&mut view, "250");
        assert_eq!(view.radius_input.value, "250");
        assert_eq!(view.overlay.width_px, 100.0);
    }

    #[test]
    fn typed_negative_zero_labels_zero_radius() {
        let mut view = WidgetView::new(200.0, 200.0, RadiusInput::new(100.0, 0.0));
        controller().edit_radius(&mut view, "-0");
        assert_eq!(view.overlay.width_px, 0.0);
        assert_eq!(view.overlay.label, "Radius indicator, radius 0 meters");
    }

    #[test]
    fn infinite_text_leaves_overlay_alone() {
        let mut view = view();
        let controller = controller();
        controller.initialize(&mut view);
        let before = view.overlay.clone();

        controller.edit_radius(&mut view, "inf");
        assert_eq!(view.radius_input.value, "inf");
        assert_eq!(view.overlay, before);
    }

    #[test]
    fn begin_request_enters_requesting() {
        let mut view = view();
        let pending = controller().begin_request(&mut view);
        assert!(pending.is_some());
        assert_eq!(view.phase, RequestPhase::Requesting);
        assert_eq!(view.status.text, messages::STATUS_REQUESTING);
        assert_eq!(view.status.style, StatusStyle::Success);
    }

    #[tokio::test]
    async fn request_location_success() {
        let mut view = view();
        controller().request_location(&mut view).await;
        assert_eq!(view.phase, RequestPhase::Success);
        assert_eq!(view.latitude, "Latitude: 25.033000");
        assert_eq!(view.overlay.width_px, 40.0);
    }
}
