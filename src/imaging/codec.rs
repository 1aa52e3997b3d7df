//! Image codec trait and shared error type.
//!
//! The [`ImageCodec`] trait is everything the thumbnail pipeline and the
//! orientation rewrite need from an image library: open a source, inspect its
//! frames, decode a frame under a pixel budget, and write the primary frame
//! back with new orientation metadata.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec), pure Rust and built on the
//! `image` crate. Tests use the recording `MockCodec` in this module.

use super::params::{EncodeParams, FrameMetadata, PixelBudget};
use crate::types::Content;
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No such image file: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unrecognized image format: {0}")]
    UnsupportedFormat(String),
    #[error("Frame {index} out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },
    #[error("Decoding failed: {0}")]
    Decode(String),
    #[error("Cannot write {0:?} containers")]
    UnsupportedContainer(ImageFormat),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Image library operations the thumbnailer depends on.
///
/// `Source` is an opened, parsed image container. Every call is synchronous;
/// a codec is shared across threads by the batch runner, hence `Sync`.
pub trait ImageCodec: Sync {
    type Source;

    /// Open encoded bytes or a file. Fails on missing files and unparseable data.
    fn open_source(&self, content: &Content) -> Result<Self::Source, CodecError>;

    /// Index of the frame that represents a still image.
    fn primary_frame_index(&self, source: &Self::Source) -> usize;

    /// Number of frames in the container, before any filtering.
    fn frame_count(&self, source: &Self::Source) -> usize;

    /// Container format, used to detect GIF and PNG sources.
    fn container_type(&self, source: &Self::Source) -> ImageFormat;

    /// Dimensions, orientation and delay of one frame, without decoding pixels.
    fn metadata_at(
        &self,
        source: &Self::Source,
        index: usize,
    ) -> Result<FrameMetadata, CodecError>;

    /// Decode one frame, rotated upright, with its longer edge within `budget`.
    fn decode_frame(
        &self,
        source: &Self::Source,
        index: usize,
        budget: PixelBudget,
    ) -> Result<DynamicImage, CodecError>;

    /// Write frame `index` into a new `params.container` carrying the new orientation.
    ///
    /// Returns [`CodecError::UnsupportedContainer`] when the codec cannot
    /// produce that container at all and [`CodecError::Decode`] when the
    /// source turns out to be unreadable. [`CodecError::Encode`] means the
    /// write itself failed.
    fn encode(
        &self,
        source: &Self::Source,
        index: usize,
        params: &EncodeParams,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Lets one codec be shared by many makers, e.g. across a batch.
impl<C: ImageCodec + ?Sized> ImageCodec for &C {
    type Source = C::Source;

    fn open_source(&self, content: &Content) -> Result<Self::Source, CodecError> {
        (**self).open_source(content)
    }

    fn primary_frame_index(&self, source: &Self::Source) -> usize {
        (**self).primary_frame_index(source)
    }

    fn frame_count(&self, source: &Self::Source) -> usize {
        (**self).frame_count(source)
    }

    fn container_type(&self, source: &Self::Source) -> ImageFormat {
        (**self).container_type(source)
    }

    fn metadata_at(
        &self,
        source: &Self::Source,
        index: usize,
    ) -> Result<FrameMetadata, CodecError> {
        (**self).metadata_at(source, index)
    }

    fn decode_frame(
        &self,
        source: &Self::Source,
        index: usize,
        budget: PixelBudget,
    ) -> Result<DynamicImage, CodecError> {
        (**self).decode_frame(source, index, budget)
    }

    fn encode(
        &self,
        source: &Self::Source,
        index: usize,
        params: &EncodeParams,
    ) -> Result<Vec<u8>, CodecError> {
        (**self).encode(source, index, params)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Orientation;
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    /// One frame the mock pretends to contain.
    #[derive(Debug, Clone, Copy)]
    pub struct MockFrame {
        pub width: u32,
        pub height: u32,
        pub delay_ms: Option<u32>,
        pub decodable: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum MockEncode {
        Succeeds,
        Unsupported,
        /// The source cannot be decoded for re-encoding.
        DecodeFails,
        Fails,
    }

    /// Mock codec that records operations and fabricates tiny rasters.
    ///
    /// Decoded frames encode their index in the red channel of pixel (0, 0)
    /// so tests can check frame order. Uses Mutex (not RefCell) so it is Sync
    /// and works with rayon's par_iter.
    pub struct MockCodec {
        pub format: ImageFormat,
        pub frames: Vec<MockFrame>,
        pub orientation: Option<u16>,
        pub opens: bool,
        pub encode: MockEncode,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Open,
        FrameCount,
        MetadataAt(usize),
        DecodeFrame {
            index: usize,
            budget: PixelBudget,
        },
        Encode {
            index: usize,
            params: EncodeParams,
        },
    }

    impl MockCodec {
        /// Single-frame image of the given format and stored size.
        pub fn still(format: ImageFormat, width: u32, height: u32) -> Self {
            Self {
                format,
                frames: vec![MockFrame {
                    width,
                    height,
                    delay_ms: None,
                    decodable: true,
                }],
                orientation: None,
                opens: true,
                encode: MockEncode::Succeeds,
                operations: Mutex::new(Vec::new()),
            }
        }

        /// GIF with one frame per delay, all of the given size.
        pub fn gif(width: u32, height: u32, delays_ms: &[u32]) -> Self {
            Self {
                frames: delays_ms
                    .iter()
                    .map(|&d| MockFrame {
                        width,
                        height,
                        delay_ms: Some(d),
                        decodable: true,
                    })
                    .collect(),
                ..Self::still(ImageFormat::Gif, width, height)
            }
        }

        pub fn with_orientation(mut self, raw: u16) -> Self {
            self.orientation = Some(raw);
            self
        }

        pub fn failing_open(mut self) -> Self {
            self.opens = false;
            self
        }

        pub fn with_encode(mut self, encode: MockEncode) -> Self {
            self.encode = encode;
            self
        }

        pub fn with_undecodable_frame(mut self, index: usize) -> Self {
            self.frames[index].decodable = false;
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn count(&self, matches: impl Fn(&RecordedOp) -> bool) -> usize {
            self.get_operations().iter().filter(|op| matches(*op)).count()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }

        fn frame(&self, index: usize) -> Result<&MockFrame, CodecError> {
            self.frames.get(index).ok_or(CodecError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            })
        }
    }

    /// Scale (width, height) so the longer edge fits `budget`.
    pub fn budgeted_size(width: u32, height: u32, budget: PixelBudget) -> (u32, u32) {
        match budget.downscale_target(width.max(height)) {
            Some(target) => {
                let factor = target as f64 / width.max(height) as f64;
                (
                    ((width as f64 * factor).round() as u32).max(1),
                    ((height as f64 * factor).round() as u32).max(1),
                )
            }
            None => (width, height),
        }
    }

    /// Red channel of pixel (0, 0), i.e. the frame index a mock raster came from.
    pub fn frame_marker(image: &DynamicImage) -> u8 {
        image.to_rgba8().get_pixel(0, 0).0[0]
    }

    impl ImageCodec for MockCodec {
        type Source = ();

        fn open_source(&self, _content: &Content) -> Result<(), CodecError> {
            self.record(RecordedOp::Open);
            if self.opens {
                Ok(())
            } else {
                Err(CodecError::UnsupportedFormat("mock".to_string()))
            }
        }

        fn primary_frame_index(&self, _source: &()) -> usize {
            0
        }

        fn frame_count(&self, _source: &()) -> usize {
            self.record(RecordedOp::FrameCount);
            self.frames.len()
        }

        fn container_type(&self, _source: &()) -> ImageFormat {
            self.format
        }

        fn metadata_at(&self, _source: &(), index: usize) -> Result<FrameMetadata, CodecError> {
            self.record(RecordedOp::MetadataAt(index));
            let frame = self.frame(index)?;
            Ok(FrameMetadata {
                pixel_width: frame.width,
                pixel_height: frame.height,
                orientation: self.orientation,
                delay_ms: frame.delay_ms,
            })
        }

        fn decode_frame(
            &self,
            _source: &(),
            index: usize,
            budget: PixelBudget,
        ) -> Result<DynamicImage, CodecError> {
            self.record(RecordedOp::DecodeFrame { index, budget });
            let frame = self.frame(index)?;
            if !frame.decodable {
                return Err(CodecError::Decode(format!("mock frame {index}")));
            }
            let swaps = self
                .orientation
                .and_then(Orientation::from_raw)
                .is_some_and(Orientation::swaps_dimensions);
            let (w, h) = if swaps {
                (frame.height, frame.width)
            } else {
                (frame.width, frame.height)
            };
            let (w, h) = budgeted_size(w, h, budget);
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                w,
                h,
                Rgba([index as u8, 0, 0, 255]),
            )))
        }

        fn encode(
            &self,
            _source: &(),
            index: usize,
            params: &EncodeParams,
        ) -> Result<Vec<u8>, CodecError> {
            self.record(RecordedOp::Encode {
                index,
                params: *params,
            });
            match self.encode {
                MockEncode::Succeeds => Ok(vec![params.orientation.raw() as u8]),
                MockEncode::Unsupported => Err(CodecError::UnsupportedContainer(params.container)),
                MockEncode::DecodeFails => Err(CodecError::Decode("mock decode".to_string())),
                MockEncode::Fails => Err(CodecError::Encode("mock finalize".to_string())),
            }
        }
    }

    #[test]
    fn mock_records_metadata() {
        let codec = MockCodec::still(ImageFormat::Jpeg, 800, 600).with_orientation(6);
        let meta = codec.metadata_at(&(), 0).unwrap();
        assert_eq!(meta.pixel_width, 800);
        assert_eq!(meta.pixel_height, 600);
        assert_eq!(meta.orientation, Some(6));

        let ops = codec.get_operations();
        assert_eq!(ops, vec![RecordedOp::MetadataAt(0)]);
    }

    #[test]
    fn mock_decode_applies_budget_and_marks_frame() {
        let codec = MockCodec::gif(400, 200, &[100, 100]);
        let image = codec.decode_frame(&(), 1, PixelBudget::Bounded(100)).unwrap();
        assert_eq!((image.width(), image.height()), (100, 50));
        assert_eq!(frame_marker(&image), 1);
    }

    #[test]
    fn mock_decode_out_of_range_errors() {
        let codec = MockCodec::still(ImageFormat::Png, 10, 10);
        let result = codec.decode_frame(&(), 3, PixelBudget::Unbounded);
        assert!(matches!(
            result,
            Err(CodecError::FrameOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn mock_failing_open() {
        let codec = MockCodec::still(ImageFormat::Png, 10, 10).failing_open();
        assert!(codec.open_source(&Content::Data(Vec::new())).is_err());
        assert_eq!(codec.get_operations(), vec![RecordedOp::Open]);
    }
}
