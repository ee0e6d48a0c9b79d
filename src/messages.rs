//! User-facing display text.
//!
//! The widget speaks a single locale; every string it shows comes from here.

use crate::location::AcquisitionFailure;
use crate::PositionReading;

pub const STATUS_IDLE: &str = "Click the button to get your location.";
pub const STATUS_CLICK_ACKNOWLEDGED: &str = "Button click detected, requesting location...";
pub const STATUS_REQUESTING: &str = "Requesting location...";
pub const STATUS_SUCCESS: &str = "Location acquired!";
pub const STATUS_UNSUPPORTED: &str = "Geolocation is not supported by this browser.";

pub const PERMISSION_DENIED: &str = "Unable to get location: permission was denied by the browser. \
Check the site settings in your browser and allow this page to access your location.";

const ERROR_PREFIX: &str = "Error getting location: ";
const POSITION_UNAVAILABLE: &str = "Location information is currently unavailable. \
Please try again later or check your network connection.";
const TIMEOUT: &str =
    "The request for your location timed out. Please check your network connection.";

pub const LATITUDE_PENDING: &str = "Latitude: --";
pub const LONGITUDE_PENDING: &str = "Longitude: --";
pub const ACCURACY_PENDING: &str = "Accuracy: --";

pub const LATITUDE_UNSUPPORTED: &str = "Latitude: Unsupported";
pub const LONGITUDE_UNSUPPORTED: &str = "Longitude: Unsupported";
pub const LATITUDE_FAILED: &str = "Latitude: Failed";
pub const LONGITUDE_FAILED: &str = "Longitude: Failed";
pub const ACCURACY_NONE: &str = "Accuracy: N/A";

/// Status text for a failed acquisition.
pub fn failure_message(failure: &AcquisitionFailure) -> String {
    match failure {
        AcquisitionFailure::PermissionDenied => PERMISSION_DENIED.to_string(),
        AcquisitionFailure::PositionUnavailable => format!("{}{}", ERROR_PREFIX, POSITION_UNAVAILABLE),
        AcquisitionFailure::Timeout => format!("{}{}", ERROR_PREFIX, TIMEOUT),
        AcquisitionFailure::Unknown { code, message } => format!(
            "{}An unknown error occurred ({}): {}",
            ERROR_PREFIX, code, message
        ),
    }
}

/// Enough fractional digits to print any `f64` exactly.
const EXACT_DIGITS: usize = 1100;

/// Fixed-point text with `digits` decimals.
///
/// Rounds to the nearest value, and an exact tie goes away from zero
/// (`12.5` prints as `13`). Plain `{:.N}` formatting would round that tie to
/// even. Negative zero prints as zero.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return number_text(value);
    }
    let value = if value == 0.0 { 0.0 } else { value };

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let frac = frac_part.as_bytes();

    let is_tie = frac.get(digits) == Some(&b'5')
        && frac
            .get(digits + 1..)
            .unwrap_or(&[])
            .iter()
            .all(|&b| b == b'0');
    if !is_tie {
        return format!("{:.*}", digits, value);
    }

    // Truncate to `digits` decimals, then add one unit in the last place.
    let mut kept: Vec<char> = int_part
        .chars()
        .chain(frac_part.chars().take(digits))
        .collect();
    let mut index = kept.len();
    loop {
        if index == 0 {
            kept.insert(0, '1');
            break;
        }
        index -= 1;
        if kept[index] == '9' {
            kept[index] = '0';
        } else {
            kept[index] = (kept[index] as u8 + 1) as char;
            break;
        }
    }

    let int_len = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(&kept[..int_len]);
    if digits > 0 {
        out.push('.');
        out.extend(&kept[int_len..]);
    }
    out
}

/// Shortest text for a number: `-0` prints as `0`, infinities as `Infinity`.
pub fn number_text(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

pub fn latitude_text(reading: &PositionReading) -> String {
    format!("Latitude: {}", to_fixed(reading.latitude, 6))
}

pub fn longitude_text(reading: &PositionReading) -> String {
    format!("Longitude: {}", to_fixed(reading.longitude, 6))
}

pub fn accuracy_text(reading: &PositionReading) -> String {
    format!("Accuracy: {} meters", to_fixed(reading.accuracy, 0))
}

/// Accessibility description of the overlay, embedding the clamped radius.
pub fn overlay_label(radius_meters: f64) -> String {
    format!("Radius indicator, radius {} meters", number_text(radius_meters))
}
