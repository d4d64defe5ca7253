//! Page-relative geometry.

use serde::{Deserialize, Serialize};

/// Bounding box with a top-left origin.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from the top of the page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from the top of the page)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
}

impl BBox {
    pub fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether `other` lies inside this box, allowing `tolerance` points of slack.
    pub fn contains(&self, other: &BBox, tolerance: f32) -> bool {
        other.x0 >= self.x0 - tolerance
            && other.top >= self.top - tolerance
            && other.x1 <= self.x1 + tolerance
            && other.bottom <= self.bottom + tolerance
    }

    /// Horizontal distance between the two boxes (0 when they overlap).
    pub fn horizontal_gap(&self, other: &BBox) -> f32 {
        (other.x0 - self.x1).max(self.x0 - other.x1).max(0.0)
    }

    /// Zero or negative area, or a non-finite coordinate.
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.x0, self.top, self.x1, self.bottom]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Whether the box lies entirely outside a page of the given size.
    pub fn is_outside(&self, page_width: f32, page_height: f32) -> bool {
        self.x1 <= 0.0 || self.bottom <= 0.0 || self.x0 >= page_width || self.top >= page_height
    }
}
