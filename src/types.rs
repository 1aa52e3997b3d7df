//! Value types shared by the pipeline, the calculations and the codecs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A width/height pair in pixels or points.
///
/// Sizes are plain values: they carry no unit and are never mutated after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `width / height`, or `None` when the height is zero (no preference).
    pub fn aspect_ratio(self) -> Option<f64> {
        if self.height == 0.0 {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    /// The same size with its axes exchanged.
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// An axis-aligned rectangle: origin plus size.
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

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Where the image bytes come from.
///
/// Only [`ImageCodec::open_source`](crate::imaging::ImageCodec::open_source)
/// looks inside this; everything else passes it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Encoded image bytes held in memory.
    Data(Vec<u8>),
    /// Path to an encoded image file on disk.
    File(PathBuf),
}

impl From<Vec<u8>> for Content {
    fn from(data: Vec<u8>) -> Self {
        Content::Data(data)
    }
}

impl From<PathBuf> for Content {
    fn from(path: PathBuf) -> Self {
        Content::File(path)
    }
}
