//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` + `ImageDecoder::orientation` |
//! | **Still thumbnail** | decode, `apply_orientation`, Lanczos3 `resize` |
//! | **Animated thumbnail** | `gif` frame headers, `GifDecoder` frames + GCD re-timing |
//! | **Orientation rewrite** | `little_exif` tag write (JPEG, TIFF) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Orientation**: The 8-way EXIF orientation and its rotate/flip algebra
//! - **Animation**: Frame re-timing onto a common tick
//! - **Parameters**: Data structures describing codec operations
//! - **Codec**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: High-level functions combining calculations + codec

mod animation;
mod calculations;
pub mod codec;
pub(crate) mod exif_orientation;
pub mod operations;
mod orientation;
mod params;
pub mod rust_codec;

pub use animation::{FrameSample, FrameSequence, exceeds_frame_limit, gcd, gcd_all, reduce_frames};
pub use calculations::{
    fill_rect, fit_rect, make_rect_with_aspect_ratio, max_pixel_dimension, oriented_size,
};
pub use codec::{CodecError, ImageCodec};
pub use orientation::{Orientation, OrientationOp, compose};
pub use params::{EncodeParams, FrameMetadata, PixelBudget};
pub use rust_codec::{RustCodec, RustSource};
