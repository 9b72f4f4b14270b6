//! Constrained-geometry engine for resize and expand requests
//!
//! Pure rectangle math over already-validated numerics: containment tests,
//! placement of the close-affordance region inside a candidate resize
//! rectangle, and the minimal on-screen adjustment for a resize view that
//! leaks past the usable bounds. Nothing here mutates stored state; the
//! controller applies the results.

use serde::{Deserialize, Serialize};

use crate::properties::ResizeProperties;

/// Edge length of the close-affordance region in screen units
pub const CLOSE_REGION_EDGE: f64 = 50.0;

/// Represents a rectangle in screen units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

/// Represents a 2D size with width and height, origin implicitly (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The size as a rectangle anchored at the origin
    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Per-axis translation that pulls a resize view back on screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adjustments {
    pub x: f64,
    pub y: f64,
}

/// Test whether `inner` lies entirely within `outer`, boundary-inclusive.
pub fn is_rect_contained(outer: &Rect, inner: &Rect) -> bool {
    trace_rect("containingRect", outer);
    trace_rect("containedRect", inner);

    inner.x >= outer.x
        && inner.max_x() <= outer.max_x()
        && inner.y >= outer.y
        && inner.max_y() <= outer.max_y()
}

/// The candidate rectangle a resize request describes: the default position
/// shifted by the requested offsets, at the requested size.
pub fn resize_rect(default_position: &Rect, candidate: &ResizeProperties) -> Rect {
    Rect::new(
        default_position.x + candidate.offset_x,
        default_position.y + candidate.offset_y,
        candidate.width,
        candidate.height,
    )
}

/// Place the fixed 50x50 close-affordance region inside the candidate
/// resize rectangle according to `custom_close_position`.
///
/// The horizontal anchor is resolved by substring match on
/// "left"/"center"/"right"; the vertical anchor by "top"/"bottom", with the
/// vertical-center branch taken only on the exact position name "center".
/// That asymmetry is part of the protocol's observable behavior and is kept
/// as-is.
pub fn close_region_rect(default_position: &Rect, candidate: &ResizeProperties) -> Rect {
    let resize = resize_rect(default_position, candidate);
    trace_rect("resizeRect", &resize);

    let position = candidate.custom_close_position.as_str();
    log::debug!("customClosePosition {position}");

    let mut close = Rect::new(0.0, 0.0, CLOSE_REGION_EDGE, CLOSE_REGION_EDGE);

    if position.contains("left") {
        close.x = resize.x;
    } else if position.contains("center") {
        close.x = resize.x + (resize.width / 2.0) - CLOSE_REGION_EDGE / 2.0;
    } else if position.contains("right") {
        close.x = resize.x + resize.width - CLOSE_REGION_EDGE;
    }

    if position.contains("top") {
        close.y = resize.y;
    } else if position == "center" {
        close.y = resize.y + (resize.height / 2.0) - CLOSE_REGION_EDGE / 2.0;
    } else if position.contains("bottom") {
        close.y = resize.y + resize.height - CLOSE_REGION_EDGE;
    }

    close
}

/// Whether the close-affordance region of a candidate resize request stays
/// entirely within the usable (max) bounds.
pub fn is_close_region_on_screen(
    default_position: &Rect,
    max_size: &Size,
    candidate: &ResizeProperties,
) -> bool {
    let close = close_region_rect(default_position, candidate);
    is_rect_contained(&max_size.as_rect(), &close)
}

/// Compute the minimal translation that pulls the candidate resize rectangle
/// back within the usable bounds, independently per axis. Zero adjustment if
/// the rectangle already fits. Never shifts both directions on one axis.
pub fn fit_resize_view_on_screen(
    default_position: &Rect,
    max_size: &Size,
    candidate: &ResizeProperties,
) -> Adjustments {
    let resize = resize_rect(default_position, candidate);
    trace_rect("resizeRect", &resize);

    let max_rect = max_size.as_rect();
    let mut adjustments = Adjustments::default();

    if is_rect_contained(&max_rect, &resize) {
        log::debug!("no adjustment necessary");
        return adjustments;
    }

    if resize.x < max_rect.x {
        adjustments.x = max_rect.x - resize.x;
    } else if resize.max_x() > max_rect.max_x() {
        adjustments.x = max_rect.max_x() - resize.max_x();
    }

    if resize.y < max_rect.y {
        adjustments.y = max_rect.y - resize.y;
    } else if resize.max_y() > max_rect.max_y() {
        adjustments.y = max_rect.max_y() - resize.max_y();
    }

    log::debug!("adjustments {},{}", adjustments.x, adjustments.y);
    adjustments
}

fn trace_rect(label: &str, rect: &Rect) {
    log::debug!(
        "{label} [{},{}],[{},{}] ({}x{})",
        rect.x,
        rect.y,
        rect.max_x(),
        rect.max_y(),
        rect.width,
        rect.height
    );
}
