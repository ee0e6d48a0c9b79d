//! # Widget Rendering
//!
//! This module draws a [`WidgetView`] either as ASCII text for a terminal or
//! into any `embedded-graphics` monochrome draw target, such as the
//! [`FrameBuffer`](crate::framebuffer::FrameBuffer) used for PBM export.
//!
//! Both renderers read only the view. They never project anything themselves:
//! the overlay diameter was already computed when the radius was applied, and
//! is scaled here from map pixels to whatever the output uses.

use crate::view::{RequestPhase, StatusStyle, WidgetView};
use chrono::{DateTime, TimeZone};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use std::fmt;

/// ASCII map size in character cells (cells are about twice as tall as wide)
const MAP_COLS: usize = 41;
const MAP_ROWS: usize = 21;

/// Frame layout
const MARGIN: i32 = 10;
const CHAR_WIDTH: i32 = 6;
const LINE_HEIGHT: i32 = 12;

/// Pixel length clamped to `[0, limit]`; NaN reads as 0.
fn clamp_px(value: f64, limit: u32) -> u32 {
    value.max(0.0).min(limit as f64).round() as u32
}

/// Short "last updated" stamp, e.g. `7/23 8:14PM`.
pub fn timestamp_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%-m/%-d %-I:%M%p").to_string()
}

fn status_marker(style: StatusStyle) -> &'static str {
    match style {
        StatusStyle::Neutral => "[..]",
        StatusStyle::Success => "[ok]",
        StatusStyle::Error => "[!!]",
    }
}

/// Greedy word wrap; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Overlay diameter as a fraction of the map width (0 to 1).
fn overlay_fraction(view: &WidgetView) -> f64 {
    if view.map_width_px > 0.0 {
        (view.overlay.width_px / view.map_width_px).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rasterise the map square with the overlay ring into character rows.
fn ascii_map(view: &WidgetView) -> Vec<String> {
    let fraction = overlay_fraction(view);
    let rx = fraction * MAP_COLS as f64 / 2.0;
    let ry = fraction * MAP_ROWS as f64 / 2.0;
    let cx = (MAP_COLS - 1) as f64 / 2.0;
    let cy = (MAP_ROWS - 1) as f64 / 2.0;

    let inside = |col: isize, row: isize| -> bool {
        if col < 0 || row < 0 || col >= MAP_COLS as isize || row >= MAP_ROWS as isize {
            return false;
        }
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let dx = (col as f64 - cx) / rx;
        let dy = (row as f64 - cy) / ry;
        dx * dx + dy * dy <= 1.0
    };

    let mut rows = Vec::with_capacity(MAP_ROWS + 2);
    rows.push(format!("┌{}┐", "─".repeat(MAP_COLS)));

    for row in 0..MAP_ROWS as isize {
        let mut line = String::with_capacity(MAP_COLS + 2);
        line.push('│');
        for col in 0..MAP_COLS as isize {
            let is_center = col as f64 == cx && row as f64 == cy;
            let on_edge = inside(col, row)
                && [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
                    .iter()
                    .any(|&(dc, dr)| !inside(col + dc, row + dr));

            line.push(if is_center {
                '+'
            } else if on_edge {
                'o'
            } else {
                ' '
            });
        }
        line.push('│');
        rows.push(line);
    }

    rows.push(format!("└{}┘", "─".repeat(MAP_COLS)));
    rows
}

/// Render the widget as terminal text.
pub fn render_ascii(view: &WidgetView) -> String {
    let mut out = Vec::new();

    out.push(format!(
        "{} {}",
        status_marker(view.status.style),
        view.status.text
    ));
    out.push(String::new());
    out.push(view.latitude.clone());
    out.push(view.longitude.clone());
    out.push(view.accuracy.clone());
    out.push(String::new());
    out.extend(ascii_map(view));
    out.push(format!(
        "{}  ({:.0}px of {:.0}px)",
        view.overlay.label, view.overlay.width_px, view.map_width_px
    ));

    out.join("\n")
}

/// Print the widget to stdout.
pub fn draw_ascii(view: &WidgetView) {
    println!("{}", render_ascii(view));
}

/// Draw the widget into a monochrome display.
///
/// The map occupies the top-left corner at its configured pixel size, the
/// readout sits to its right and the status line wraps across the bottom.
/// An error status is boxed.
pub fn draw_frame<D>(view: &WidgetView, display: &mut D, updated: Option<&str>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let bounds = display.bounding_box();
    let frame_width = i32::try_from(bounds.size.width).unwrap_or(i32::MAX);
    let frame_height = i32::try_from(bounds.size.height).unwrap_or(i32::MAX);

    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    // Map surface and overlay, never larger than the frame itself
    let map_size = Size::new(
        clamp_px(view.map_width_px, frame_width as u32),
        clamp_px(view.map_height_px, frame_height as u32),
    );
    let map_area = Rectangle::new(Point::new(MARGIN, MARGIN), map_size);
    map_area.into_styled(stroke).draw(display)?;

    let center = map_area.center();
    let diameter = clamp_px(view.overlay.width_px, map_size.width);
    {
        let mut map = display.clipped(&map_area);
        if diameter > 0 {
            Circle::with_center(center, diameter)
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
                .draw(&mut map)?;
        }
        if view.phase == RequestPhase::Success {
            Circle::with_center(center, 5)
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(&mut map)?;
        } else {
            Pixel(center, BinaryColor::On).draw(&mut map)?;
        }
    }

    // Readout column
    let column_x = (MARGIN * 2).saturating_add(map_size.width as i32);
    let column_chars = (frame_width.saturating_sub(column_x).saturating_sub(MARGIN) / CHAR_WIDTH)
        .max(0) as usize;
    let mut y = MARGIN;

    if column_chars > 0 {
        let mut column: Vec<String> = Vec::new();
        if let Some(updated) = updated {
            column.extend(wrap_text(&format!("Updated {}", updated), column_chars));
            column.push(String::new());
        }
        for text in [&view.latitude, &view.longitude, &view.accuracy] {
            column.extend(wrap_text(text, column_chars));
        }
        column.push(String::new());
        column.extend(wrap_text(&view.overlay.label, column_chars));

        for line in &column {
            Text::with_baseline(line, Point::new(column_x, y), text_style, Baseline::Top)
                .draw(display)?;
            y = y.saturating_add(LINE_HEIGHT);
        }
    }

    // Status line below whichever is taller
    let status_top = (MARGIN * 2)
        .saturating_add(map_size.height as i32)
        .max(y.saturating_add(MARGIN));
    let status_chars = (frame_width.saturating_sub(2 * MARGIN) / CHAR_WIDTH - 1).max(1) as usize;
    let status_text = format!(
        "{} {}",
        status_marker(view.status.style),
        view.status.text
    );
    let status_lines = wrap_text(&status_text, status_chars);

    let mut line_y = status_top.saturating_add(2);
    for line in &status_lines {
        if line_y.saturating_add(LINE_HEIGHT) > frame_height {
            break;
        }
        Text::with_baseline(line, Point::new(MARGIN + 3, line_y), text_style, Baseline::Top)
            .draw(display)?;
        line_y += LINE_HEIGHT;
    }

    if view.status.style == StatusStyle::Error {
        let box_height = (line_y - status_top + 2).max(0) as u32;
        Rectangle::new(
            Point::new(MARGIN, status_top),
            Size::new(frame_width.saturating_sub(2 * MARGIN).max(0) as u32, box_height),
        )
        .into_styled(stroke)
        .draw(display)?;
    }

    Ok(())
}
