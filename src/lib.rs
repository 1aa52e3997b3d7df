//! # Image Thumbnailer
//!
//! Downscaled previews of still images and animated GIFs, plus lossless
//! 90° rotations and horizontal flips done by rewriting orientation metadata.
//!
//! ```no_run
//! use image_thumbnailer::{Configuration, Thumbnail, ThumbnailMaker, rotate_image};
//!
//! let maker = ThumbnailMaker::from_path("photo.jpg", Configuration::with_size(200.0, 200.0));
//! match maker.prepare_thumbnail() {
//!     Some(Thumbnail::Still(image)) => println!("{}x{}", image.width(), image.height()),
//!     Some(Thumbnail::Animated(gif)) => println!("{} frames", gif.frames.len()),
//!     None => println!("no thumbnail"),
//! }
//!
//! let rotated: Option<Vec<u8>> = rotate_image(std::path::PathBuf::from("photo.jpg"), true)?;
//! # Ok::<(), image_thumbnailer::RewriteError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`maker`] | [`ThumbnailMaker`]: the thumbnail pipeline and orientation rewrites for one content |
//! | [`batch`] | Many thumbnails in parallel on a rayon pool |
//! | [`config`] | [`Configuration`], `thumbnailer.toml` loading and validation |
//! | [`types`] | Shared value types: [`Size`], [`Rect`], [`Content`] |
//! | [`imaging`] | Budget math, orientation algebra, frame re-timing, the codec trait and its `image`-crate implementation |
//!
//! # Design Decisions
//!
//! ## Absence Over Errors
//!
//! A thumbnail either exists or it doesn't. Unreadable files, unknown formats
//! and decode failures all return `None` (and are logged with the `log`
//! crate). The one structured error is [`RewriteError`]: an orientation
//! rewrite that opened and read the image but could not write it back means
//! the codec broke its contract, which callers should hear about.
//!
//! ## Decode Budget, Not Exact Size
//!
//! The pipeline never crops. It picks the longest edge the decoder must
//! produce so the caller can crop (Fill) or letterbox (Fit) to the requested
//! box without upscaling. See [`imaging::max_pixel_dimension`].
//!
//! ## Animated GIFs On One Tick
//!
//! Per-frame GIF delays are re-expressed as one frame delay (the GCD of all
//! delays) with longer frames repeated. Repeats share one `Arc` raster.
//!
//! ## Metadata-Only Rotation
//!
//! Rotating a JPEG or TIFF rewrites the EXIF orientation tag and copies every
//! other byte, so there is no generation loss and embedded gain maps survive.
//! PNG has no rewritable tag and is re-encoded as JPEG.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod maker;
pub mod types;

pub use config::{Configuration, ProcessingConfig, ScaleMode};
pub use maker::{
    AnimatedThumbnail, RewriteError, Thumbnail, ThumbnailMaker, flip_image, rotate_image,
};
pub use types::{Content, Rect, Size};

#[cfg(test)]
pub(crate) mod test_helpers;
