//! Coordinate types and safe-zone clamping.
//!
//! Positions are persisted as [`NormalizedPosition`]s (fractions of the
//! slide box) and turned into [`PixelPosition`]s per host, because the editor
//! and the profile view have different fixed chrome around the same slide.

use serde::{Deserialize, Serialize};

// ============================================================================
// Sizes and Positions
// ============================================================================

/// A 2D size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizePx {
    pub width: f32,
    pub height: f32,
}

impl SizePx {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero, negative or not finite.
    ///
    /// A container is degenerate before its first layout pass.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A top-left anchored position in logical pixels, relative to the slide box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: f32,
    pub y: f32,
}

impl PixelPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offsets this position by a gesture translation.
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Clamps each axis to `[0, container - element]`.
    ///
    /// If the element is larger than the container the upper bound collapses
    /// to zero.
    pub fn clamp_within(self, container: SizePx, element: SizePx) -> Self {
        let max_x = (container.width - element.width).max(0.0);
        let max_y = (container.height - element.height).max(0.0);
        Self::new(self.x.clamp(0.0, max_x), self.y.clamp(0.0, max_y))
    }

    /// Converts to a fraction of the container.
    ///
    /// Returns `None` when the container has no usable size yet.
    pub fn to_normalized(self, container: SizePx) -> Option<NormalizedPosition> {
        if container.is_degenerate() {
            return None;
        }
        Some(NormalizedPosition::new(
            self.x / container.width,
            self.y / container.height,
        ))
    }
}

/// A device-independent position: fractions of the slide's width and height.
///
/// Stored values may be raw; clamping happens when a host renders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct NormalizedPosition {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPosition {
    /// Where a fresh caption lands: near the left edge, below the header.
    pub const DEFAULT: Self = Self { x: 0.06, y: 0.24 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scales to pixels without any clamping.
    pub fn to_pixels(self, container: SizePx) -> PixelPosition {
        PixelPosition::new(self.x * container.width, self.y * container.height)
    }
}

impl Default for NormalizedPosition {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Safe Zone
// ============================================================================

/// Per-edge distances, in pixels, that fixed chrome covers on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SafeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl SafeInsets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(inset: f32) -> Self {
        Self::new(inset, inset, inset, inset)
    }
}

/// Places a normalized position inside the safe zone of a container.
///
/// The left/top bound is `inset / dimension`, the right/bottom bound is
/// `(dimension - inset - element) / dimension`, combined as
/// `max(min_norm, min(max_norm, value))`. The result is then held to
/// `[0, container - element]` so an element never leaves the container even
/// when the insets are larger than the container itself.
///
/// A degenerate container yields the origin.
pub fn clamp_to_safe_zone(
    pos: NormalizedPosition,
    container: SizePx,
    element: SizePx,
    insets: SafeInsets,
) -> PixelPosition {
    if container.is_degenerate() {
        return PixelPosition::default();
    }

    let x = clamp_axis(
        pos.x,
        container.width,
        element.width,
        insets.left,
        insets.right,
    );
    let y = clamp_axis(
        pos.y,
        container.height,
        element.height,
        insets.top,
        insets.bottom,
    );

    PixelPosition::new(x * container.width, y * container.height).clamp_within(container, element)
}

fn clamp_axis(value: f32, dimension: f32, element: f32, lead: f32, trail: f32) -> f32 {
    let value = if value.is_finite() { value } else { 0.0 };
    let min_norm = lead / dimension;
    let max_norm = (dimension - trail - element) / dimension;
    min_norm.max(max_norm.min(value))
}

// ============================================================================
// Tests
// ============================================================================
