//! Footer visibility predicate driving automatic load-more.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
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

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Edges touching counts as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    /// Grow the rectangle toward the origin by `inset`.
    ///
    /// The far edges stay where they are, so a footer sitting below the
    /// content reaches up into it.
    pub fn grown_toward_origin(&self, inset: Size) -> Rect {
        Rect {
            x: self.x - inset.width,
            y: self.y - inset.height,
            width: self.width + inset.width,
            height: self.height + inset.height,
        }
    }
}

/// Scroll position reported by the list on every offset change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Visible bounds of the scroll view in content coordinates.
    pub bounds: Rect,
    /// Total scrollable content extent.
    pub content_size: Size,
    /// Footer frame in content coordinates. `None` when the footer is not
    /// part of the rendered list.
    pub footer_frame: Option<Rect>,
}

impl ScrollMetrics {
    /// Content exceeds the viewport in either axis, or simply has height.
    ///
    /// The last clause keeps very short lists eligible.
    pub fn has_scrollable_content(&self) -> bool {
        self.content_size.height > self.bounds.height
            || self.content_size.width > self.bounds.width
            || self.content_size.height > 0.0
    }
}

/// Whether the footer counts as on screen for `metrics`.
///
/// Ignores the loader's re-entrancy guards; those are checked by the
/// loader itself.
pub fn footer_visible(metrics: &ScrollMetrics, inset: Size) -> bool {
    let Some(footer) = metrics.footer_frame else {
        return false;
    };
    metrics.has_scrollable_content()
        && metrics.bounds.intersects(&footer.grown_toward_origin(inset))
}
