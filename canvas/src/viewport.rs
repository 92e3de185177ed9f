#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{
    CANVAS_BASE_HEIGHT_PX, CANVAS_BASE_WIDTH_PX, POSITION_MAX, POSITION_MIN, ZOOM_DEFAULT_PERCENT, ZOOM_MAX_PERCENT,
    ZOOM_MIN_PERCENT, ZOOM_STEP_PERCENT,
};

/// A point in client (CSS pixel) space or in percentage space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

/// Bounding box of the canvas element in client coordinates.
///
/// Mirrors `Element.getBoundingClientRect()`; `left`/`top` are the element's
/// client offset, `width`/`height` its rendered size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, width: CANVAS_BASE_WIDTH_PX, height: CANVAS_BASE_HEIGHT_PX }
    }
}

impl CanvasBounds {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether the bounds have a usable (positive, finite) area.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Convert a client-space point to percent of the canvas, without clamping.
    ///
    /// Degenerate bounds map everything to the origin.
    #[must_use]
    pub fn client_to_percent(&self, client: Point) -> Point {
        if !self.is_usable() {
            return Point::new(0.0, 0.0);
        }
        Point {
            x: (client.x - self.left) / self.width * 100.0,
            y: (client.y - self.top) / self.height * 100.0,
        }
    }

    /// Convert a percentage-space point back to client coordinates.
    #[must_use]
    pub fn percent_to_client(&self, pct: Point) -> Point {
        Point {
            x: self.left + pct.x / 100.0 * self.width,
            y: self.top + pct.y / 100.0 * self.height,
        }
    }
}

/// Clamp a percentage coordinate into `[0, 100]`. NaN maps to 0.
#[must_use]
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        return POSITION_MIN;
    }
    v.clamp(POSITION_MIN, POSITION_MAX)
}

/// View zoom for the canvas element, in whole percent.
///
/// Zoom only changes the rendered size of the canvas; item positions are
/// percentages and survive any zoom level unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(u32);

impl Default for Zoom {
    fn default() -> Self {
        Self(ZOOM_DEFAULT_PERCENT)
    }
}

impl Zoom {
    #[must_use]
    pub fn percent(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn zoom_in(self) -> Self {
        Self((self.0 + ZOOM_STEP_PERCENT).min(ZOOM_MAX_PERCENT))
    }

    #[must_use]
    pub fn zoom_out(self) -> Self {
        Self(self.0.saturating_sub(ZOOM_STEP_PERCENT).max(ZOOM_MIN_PERCENT))
    }

    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }

    /// Rendered canvas size `(width, height)` in CSS pixels at this zoom.
    #[must_use]
    pub fn canvas_size_px(self) -> (f64, f64) {
        let factor = f64::from(self.0) / 100.0;
        (CANVAS_BASE_WIDTH_PX * factor, CANVAS_BASE_HEIGHT_PX * factor)
    }
}
