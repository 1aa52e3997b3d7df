//! Parameter types passed to the codec.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to decode or encode) and the [`codec`](super::codec)
//! (which does the actual pixel work). This separation allows swapping codecs
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`PixelBudget`]: Longest edge a decoded frame may have, or unbounded.
//! - [`FrameMetadata`]: What the codec reports about one frame without decoding it.
//! - [`EncodeParams`]: Target container and orientation for a metadata rewrite.

use super::orientation::Orientation;
use image::ImageFormat;

/// Largest allowed edge of a decoded frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelBudget {
    Bounded(u32),
    /// Decode at native resolution.
    Unbounded,
}

impl PixelBudget {
    /// Convert a point budget to pixels: multiply by the display scale and
    /// round to nearest. A bounded budget is at least one pixel.
    pub fn from_point_size(max_point_size: Option<f64>, scale: f64) -> Self {
        match max_point_size {
            Some(points) => {
                let pixels = (points * scale).round();
                PixelBudget::Bounded(pixels.clamp(1.0, u32::MAX as f64) as u32)
            }
            None => PixelBudget::Unbounded,
        }
    }

    /// Target edge for an image whose longer edge is `longer_edge`, or
    /// `None` when it already fits. Never upscales.
    pub fn downscale_target(self, longer_edge: u32) -> Option<u32> {
        match self {
            PixelBudget::Bounded(max) if max < longer_edge => Some(max),
            _ => None,
        }
    }
}

/// Per-frame properties read from the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameMetadata {
    /// Stored width, before orientation is applied.
    pub pixel_width: u32,
    /// Stored height, before orientation is applied.
    pub pixel_height: u32,
    /// Raw EXIF orientation value, when the container carries one.
    pub orientation: Option<u16>,
    /// Animation delay for this frame, when the container is animated.
    pub delay_ms: Option<u32>,
}

impl FrameMetadata {
    /// Parsed orientation; missing or out-of-range values are `None`.
    pub fn parsed_orientation(&self) -> Option<Orientation> {
        self.orientation.and_then(Orientation::from_raw)
    }
}

/// Parameters for writing the primary frame with new orientation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub container: ImageFormat,
    pub orientation: Orientation,
    /// Keep auxiliary HDR gain-map data alongside the primary image.
    pub preserve_gain_map: bool,
}
