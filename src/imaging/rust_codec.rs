//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::guess_format` |
//! | Header validation, dimensions | `ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate decoders |
//! | GIF frame count and delays | `gif::Decoder::next_frame_info` (headers, no pixels) |
//! | Decode GIF frames | `GifDecoder` + `AnimationDecoder::into_frames` |
//! | Orientation read | `ImageDecoder::orientation` |
//! | Upright rotation | `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize` with `Lanczos3` filter |
//! | Orientation tag write (JPEG, TIFF) | `little_exif`, see [`exif_orientation`](super::exif_orientation) |
//! | PNG → JPEG | `JpegEncoder` at quality 90, then the orientation tag is added |
//!
//! Orientation rewrites of JPEG and TIFF touch only the EXIF block, so pixel
//! data and any gain map stored after the primary image survive unchanged.
//!
//! GIF sources never composite the whole animation just to count it or to
//! produce a still: frame count and delays come from frame headers, and
//! frame 0 is decoded on its own. The full frame cache fills only when a
//! later frame is asked for.

use super::codec::{CodecError, ImageCodec};
use super::exif_orientation::{write_jpeg_orientation, write_tiff_orientation};
use super::params::{EncodeParams, FrameMetadata, PixelBudget};
use crate::types::Content;
use image::codecs::gif::GifDecoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation as ExifOrientation;
use image::{AnimationDecoder, DynamicImage, Frame, ImageDecoder, ImageError, ImageFormat, ImageReader};
use log::{debug, warn};
use std::cell::OnceCell;
use std::io::Cursor;

const JPEG_QUALITY: u8 = 90;

/// Pure Rust codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// GIF logical screen and per-frame delays, read from headers only.
#[derive(Debug, Clone, Default)]
struct GifHeaders {
    width: u32,
    height: u32,
    delays_ms: Vec<u32>,
}

/// An opened image: its encoded bytes and sniffed format.
pub struct RustSource {
    bytes: Vec<u8>,
    format: ImageFormat,
    gif_headers: OnceCell<GifHeaders>,
    /// Composited GIF frames, decoded on first access past frame 0.
    gif_frames: OnceCell<Vec<Frame>>,
}

impl RustSource {
    fn reader(&self) -> ImageReader<Cursor<&[u8]>> {
        ImageReader::with_format(Cursor::new(self.bytes.as_slice()), self.format)
    }

    fn is_gif(&self) -> bool {
        self.format == ImageFormat::Gif
    }

    /// Walk the GIF frame headers without decompressing pixel data into
    /// RGBA. A header that fails to parse ends the walk.
    fn gif_headers(&self) -> &GifHeaders {
        self.gif_headers.get_or_init(|| {
            let mut options = gif::DecodeOptions::new();
            options.set_color_output(gif::ColorOutput::Indexed);
            let mut decoder = match options.read_info(Cursor::new(self.bytes.as_slice())) {
                Ok(decoder) => decoder,
                Err(e) => {
                    warn!("Failed to read GIF header: {e}");
                    return GifHeaders::default();
                }
            };
            let mut headers = GifHeaders {
                width: u32::from(decoder.width()),
                height: u32::from(decoder.height()),
                delays_ms: Vec::new(),
            };
            loop {
                match decoder.next_frame_info() {
                    Ok(Some(frame)) => headers.delays_ms.push(u32::from(frame.delay) * 10),
                    Ok(None) => break,
                    Err(e) => {
                        warn!("GIF frame header {} unreadable: {e}", headers.delays_ms.len());
                        break;
                    }
                }
            }
            headers
        })
    }

    fn check_gif_index(&self, index: usize) -> Result<&GifHeaders, CodecError> {
        let headers = self.gif_headers();
        if index < headers.delays_ms.len() {
            Ok(headers)
        } else {
            Err(CodecError::FrameOutOfRange {
                index,
                count: headers.delays_ms.len(),
            })
        }
    }

    fn gif_decoder(&self) -> Result<GifDecoder<Cursor<&[u8]>>, CodecError> {
        GifDecoder::new(Cursor::new(self.bytes.as_slice())).map_err(decode_error)
    }

    /// Decode every GIF frame once. A frame that fails to decode ends the
    /// sequence; the frames before it are kept.
    fn gif_frames(&self) -> &[Frame] {
        self.gif_frames.get_or_init(|| {
            let decoder = match self.gif_decoder() {
                Ok(decoder) => decoder,
                Err(e) => {
                    warn!("Failed to read GIF: {e}");
                    return Vec::new();
                }
            };
            let mut frames = Vec::new();
            for frame in decoder.into_frames() {
                match frame {
                    Ok(frame) => frames.push(frame),
                    Err(e) => {
                        warn!("Stopping GIF decode after {} frames: {e}", frames.len());
                        break;
                    }
                }
            }
            frames
        })
    }

    /// Composited RGBA for one GIF frame. Frame 0 is decoded alone unless
    /// the full sequence is already cached.
    fn gif_frame_image(&self, index: usize) -> Result<DynamicImage, CodecError> {
        self.check_gif_index(index)?;
        if index == 0 && self.gif_frames.get().is_none() {
            let first = self
                .gif_decoder()?
                .into_frames()
                .next()
                .ok_or(CodecError::FrameOutOfRange { index, count: 0 })?
                .map_err(decode_error)?;
            return Ok(DynamicImage::ImageRgba8(first.into_buffer()));
        }
        let frames = self.gif_frames();
        let frame = frames.get(index).ok_or(CodecError::FrameOutOfRange {
            index,
            count: frames.len(),
        })?;
        Ok(DynamicImage::ImageRgba8(frame.buffer().clone()))
    }

    fn has_exif(&self) -> bool {
        self.reader()
            .into_decoder()
            .ok()
            .and_then(|mut decoder| decoder.exif_metadata().ok().flatten())
            .is_some()
    }

    /// Raw EXIF orientation, `None` when the container carries no EXIF.
    ///
    /// TIFF always has IFD0, so a TIFF without the tag reports 1.
    fn stored_orientation(&self) -> Option<u16> {
        if self.is_gif() {
            return None;
        }
        if self.format != ImageFormat::Tiff && !self.has_exif() {
            return None;
        }
        let mut decoder = self.reader().into_decoder().ok()?;
        let orientation = decoder.orientation().ok()?;
        Some(u16::from(orientation.to_exif()))
    }
}

fn decode_error(e: ImageError) -> CodecError {
    CodecError::Decode(e.to_string())
}

/// Shrink `image` so its longer edge fits `budget`. Never upscales.
fn fit_to_budget(image: DynamicImage, budget: PixelBudget) -> DynamicImage {
    match budget.downscale_target(image.width().max(image.height())) {
        Some(edge) => image.resize(edge, edge, FilterType::Lanczos3),
        None => image,
    }
}

fn check_primary(index: usize) -> Result<(), CodecError> {
    if index == 0 {
        Ok(())
    } else {
        Err(CodecError::FrameOutOfRange { index, count: 1 })
    }
}

/// Decode a PNG without applying orientation and re-encode it as JPEG.
fn png_to_jpeg(source: &RustSource) -> Result<Vec<u8>, CodecError> {
    let image = source.reader().decode().map_err(decode_error)?;
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(out)
}

impl ImageCodec for RustCodec {
    type Source = RustSource;

    fn open_source(&self, content: &Content) -> Result<RustSource, CodecError> {
        let bytes = match content {
            Content::Data(data) => data.clone(),
            Content::File(path) => {
                if !path.is_file() {
                    return Err(CodecError::NotFound(path.clone()));
                }
                std::fs::read(path)?
            }
        };
        let format = image::guess_format(&bytes)
            .map_err(|e| CodecError::UnsupportedFormat(e.to_string()))?;
        if !format.reading_enabled() {
            return Err(CodecError::UnsupportedFormat(format!("{format:?}")));
        }
        let source = RustSource {
            bytes,
            format,
            gif_headers: OnceCell::new(),
            gif_frames: OnceCell::new(),
        };
        // Magic bytes alone are not enough: the header must parse too.
        source.reader().into_dimensions().map_err(decode_error)?;
        debug!("Opened {format:?} source ({} bytes)", source.bytes.len());
        Ok(source)
    }

    fn primary_frame_index(&self, _source: &RustSource) -> usize {
        0
    }

    fn frame_count(&self, source: &RustSource) -> usize {
        if source.is_gif() {
            source.gif_headers().delays_ms.len()
        } else {
            1
        }
    }

    fn container_type(&self, source: &RustSource) -> ImageFormat {
        source.format
    }

    fn metadata_at(&self, source: &RustSource, index: usize) -> Result<FrameMetadata, CodecError> {
        if source.is_gif() {
            let headers = source.check_gif_index(index)?;
            return Ok(FrameMetadata {
                pixel_width: headers.width,
                pixel_height: headers.height,
                orientation: None,
                delay_ms: Some(headers.delays_ms[index]),
            });
        }

        check_primary(index)?;
        let (pixel_width, pixel_height) = source.reader().into_dimensions().map_err(decode_error)?;
        Ok(FrameMetadata {
            pixel_width,
            pixel_height,
            orientation: source.stored_orientation(),
            delay_ms: None,
        })
    }

    fn decode_frame(
        &self,
        source: &RustSource,
        index: usize,
        budget: PixelBudget,
    ) -> Result<DynamicImage, CodecError> {
        if source.is_gif() {
            return Ok(fit_to_budget(source.gif_frame_image(index)?, budget));
        }

        check_primary(index)?;
        let mut decoder = source.reader().into_decoder().map_err(decode_error)?;
        let orientation = decoder.orientation().unwrap_or_else(|e| {
            debug!("Ignoring unreadable orientation: {e}");
            ExifOrientation::NoTransforms
        });
        let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        image.apply_orientation(orientation);
        Ok(fit_to_budget(image, budget))
    }

    fn encode(
        &self,
        source: &RustSource,
        index: usize,
        params: &EncodeParams,
    ) -> Result<Vec<u8>, CodecError> {
        check_primary(index)?;
        let raw = params.orientation.raw();

        match (source.format, params.container) {
            (ImageFormat::Jpeg, ImageFormat::Jpeg) => {
                Ok(write_jpeg_orientation(&source.bytes, raw, source.has_exif())?)
            }
            (ImageFormat::Tiff, ImageFormat::Tiff) => {
                Ok(write_tiff_orientation(&source.bytes, raw)?)
            }
            (ImageFormat::Png, ImageFormat::Jpeg) => {
                let jpeg = png_to_jpeg(source)?;
                Ok(write_jpeg_orientation(&jpeg, raw, false)?)
            }
            (_, container) => Err(CodecError::UnsupportedContainer(container)),
        }
    }
}
