//! Thumbnail pipeline and orientation rewrites for one piece of content.
//!
//! A [`ThumbnailMaker`] pairs a [`Content`] with a [`Configuration`] and a
//! codec. [`prepare_thumbnail`](ThumbnailMaker::prepare_thumbnail) runs the
//! pipeline:
//!
//! ```text
//! open source → original size (cached) → pixel budget
//!     → animated GIF?  decode frames, re-time onto one tick
//!     → otherwise      decode the primary frame
//! ```
//!
//! Every failure along the way (unreadable file, unknown format, codec
//! error) is logged and the result is `None`. Animated output falls back to a
//! still frame rather than failing.
//!
//! [`rewrite_orientation`](ThumbnailMaker::rewrite_orientation) is separate:
//! it changes only the orientation metadata and returns the new file bytes.

use crate::config::Configuration;
use crate::imaging::operations;
use crate::imaging::{
    CodecError, FrameSequence, ImageCodec, OrientationOp, PixelBudget, RustCodec,
    max_pixel_dimension,
};
use crate::types::{Content, Size};
use image::DynamicImage;
use log::{debug, error, warn};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;

/// A prepared thumbnail.
#[derive(Debug, Clone)]
pub enum Thumbnail {
    Still(DynamicImage),
    Animated(AnimatedThumbnail),
}

impl Thumbnail {
    pub fn is_animated(&self) -> bool {
        matches!(self, Thumbnail::Animated(_))
    }
}

/// Frames shown for `frame_delay` each; repeated frames share one raster.
#[derive(Debug, Clone)]
pub struct AnimatedThumbnail {
    pub frames: Vec<Arc<DynamicImage>>,
    pub frame_delay: Duration,
    pub duration: Duration,
}

impl From<FrameSequence<Arc<DynamicImage>>> for AnimatedThumbnail {
    fn from(sequence: FrameSequence<Arc<DynamicImage>>) -> Self {
        Self {
            frame_delay: sequence.frame_delay(),
            duration: sequence.duration(),
            frames: sequence.frames,
        }
    }
}

/// The codec opened and decoded the source but could not write it back.
///
/// This is not an "unsupported image" outcome; those are `Ok(None)`.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Failed to finalize orientation rewrite: {0}")]
    Finalize(#[source] CodecError),
}

/// Produces thumbnails and orientation rewrites for one content.
///
/// The original image size is read at most once per maker and then reused.
pub struct ThumbnailMaker<C: ImageCodec = RustCodec> {
    content: Content,
    configuration: Configuration,
    codec: C,
    cached_original_size: OnceLock<Size>,
}

impl ThumbnailMaker<RustCodec> {
    pub fn new(content: impl Into<Content>, configuration: Configuration) -> Self {
        Self::with_codec(content, configuration, RustCodec::new())
    }

    pub fn from_data(data: Vec<u8>, configuration: Configuration) -> Self {
        Self::new(Content::Data(data), configuration)
    }

    pub fn from_path(path: impl Into<PathBuf>, configuration: Configuration) -> Self {
        Self::new(Content::File(path.into()), configuration)
    }
}

impl<C: ImageCodec> ThumbnailMaker<C> {
    pub fn with_codec(content: impl Into<Content>, configuration: Configuration, codec: C) -> Self {
        Self {
            content: content.into(),
            configuration,
            codec,
            cached_original_size: OnceLock::new(),
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Displayed size of the original image, with sideways orientations
    /// already swapped. Opens the source only when not yet cached.
    pub fn original_image_size(&self) -> Option<Size> {
        if let Some(size) = self.cached_original_size.get() {
            return Some(*size);
        }
        let source = self.open()?;
        self.resolve_original_size(&source)
    }

    /// Run the thumbnail pipeline.
    pub fn prepare_thumbnail(&self) -> Option<Thumbnail> {
        let source = self.open()?;
        let config = &self.configuration;

        let original = self.resolve_original_size(&source);
        let max_points = max_pixel_dimension(original, config.thumbnail_size, config.scale_mode);
        let budget = PixelBudget::from_point_size(max_points, config.scale);
        debug!("Thumbnail budget {budget:?} for original {original:?}");

        if config.allows_animation {
            if let Some(sequence) = operations::make_animation(
                &self.codec,
                &source,
                budget,
                config.max_animation_frames,
            ) {
                return Some(Thumbnail::Animated(sequence.into()));
            }
        }

        match operations::make_still(&self.codec, &source, budget) {
            Ok(image) => Some(Thumbnail::Still(image)),
            Err(e) => {
                warn!("Failed to decode thumbnail: {e}");
                None
            }
        }
    }

    /// Write the image back with its orientation changed by `op`.
    ///
    /// `Ok(None)` when the content cannot be opened or decoded, or its
    /// container cannot carry a rewritten orientation. PNG input comes back
    /// as JPEG. Only a failed encode after a good decode is an error.
    pub fn rewrite_orientation(&self, op: OrientationOp) -> Result<Option<Vec<u8>>, RewriteError> {
        let Some(source) = self.open() else {
            return Ok(None);
        };
        match operations::rewrite_orientation(&self.codec, &source, op) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(CodecError::UnsupportedContainer(format)) => {
                debug!("Orientation rewrite not supported for {format:?}");
                Ok(None)
            }
            Err(e @ CodecError::Encode(_)) => {
                error!("Orientation rewrite failed after a successful decode: {e}");
                Err(RewriteError::Finalize(e))
            }
            Err(e) => {
                warn!("Cannot read image for orientation rewrite: {e}");
                Ok(None)
            }
        }
    }

    fn open(&self) -> Option<C::Source> {
        match self.codec.open_source(&self.content) {
            Ok(source) => Some(source),
            Err(e) => {
                debug!("Cannot open image: {e}");
                None
            }
        }
    }

    fn resolve_original_size(&self, source: &C::Source) -> Option<Size> {
        if let Some(size) = self.cached_original_size.get() {
            return Some(*size);
        }
        match operations::read_original_size(&self.codec, source) {
            Ok(size) => Some(*self.cached_original_size.get_or_init(|| size)),
            Err(e) => {
                warn!("Failed to read image size: {e}");
                None
            }
        }
    }
}

/// Rotate an image by 90° through its orientation metadata.
pub fn rotate_image(
    content: impl Into<Content>,
    clockwise: bool,
) -> Result<Option<Vec<u8>>, RewriteError> {
    ThumbnailMaker::new(content, Configuration::default())
        .rewrite_orientation(OrientationOp::Rotate { clockwise })
}

/// Mirror an image horizontally through its orientation metadata.
pub fn flip_image(content: impl Into<Content>) -> Result<Option<Vec<u8>>, RewriteError> {
    ThumbnailMaker::new(content, Configuration::default())
        .rewrite_orientation(OrientationOp::FlipHorizontal)
}
