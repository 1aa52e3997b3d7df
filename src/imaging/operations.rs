//! High-level image operations.
//!
//! These functions combine calculations with codec execution. Each takes an
//! already opened source, decides what to decode or encode, and calls the
//! codec. Mapping failures to "no result" is left to the caller.

use super::animation::{FrameSample, FrameSequence, exceeds_frame_limit, reduce_frames};
use super::calculations::oriented_size;
use super::codec::{CodecError, ImageCodec};
use super::orientation::{Orientation, OrientationOp, compose};
use super::params::{EncodeParams, PixelBudget};
use crate::types::Size;
use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use std::sync::Arc;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Displayed size of the primary frame.
///
/// Orientations that turn the image sideways swap width and height.
pub fn read_original_size<C: ImageCodec>(codec: &C, source: &C::Source) -> Result<Size> {
    let meta = codec.metadata_at(source, codec.primary_frame_index(source))?;
    let swaps = meta
        .parsed_orientation()
        .is_some_and(Orientation::swaps_dimensions);
    Ok(oriented_size(meta.pixel_width, meta.pixel_height, swaps))
}

/// Decode every frame of an animated GIF and lay it out on one tick.
///
/// Returns `None` when the still path should be used instead: the source is
/// not a multi-frame GIF, it has more raw frames than `max_frames`, or no
/// frame with a positive delay could be decoded. Frames with a zero delay are
/// skipped before decoding; frames that fail to decode are dropped.
pub fn make_animation<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    budget: PixelBudget,
    max_frames: Option<usize>,
) -> Option<FrameSequence<Arc<DynamicImage>>> {
    if codec.container_type(source) != ImageFormat::Gif {
        return None;
    }
    let frame_count = codec.frame_count(source);
    if frame_count <= 1 {
        return None;
    }
    if exceeds_frame_limit(frame_count, max_frames) {
        debug!(
            "GIF has {frame_count} frames, over the limit of {}; using a still frame",
            max_frames.unwrap_or_default()
        );
        return None;
    }

    let mut samples = Vec::with_capacity(frame_count);
    for index in 0..frame_count {
        let delay_ms = match codec.metadata_at(source, index) {
            Ok(meta) => meta.delay_ms.unwrap_or(0),
            Err(e) => {
                warn!("Skipping GIF frame {index}: {e}");
                continue;
            }
        };
        if delay_ms == 0 {
            continue;
        }
        match codec.decode_frame(source, index, budget) {
            Ok(frame) => samples.push(FrameSample::new(Arc::new(frame), delay_ms)),
            Err(e) => warn!("Dropping GIF frame {index}: {e}"),
        }
    }

    let sequence = reduce_frames(samples);
    if sequence.is_none() {
        debug!("No displayable GIF frames; using a still frame");
    }
    sequence
}

/// Decode the primary frame within `budget`.
pub fn make_still<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    budget: PixelBudget,
) -> Result<DynamicImage> {
    codec.decode_frame(source, codec.primary_frame_index(source), budget)
}

/// Container an orientation rewrite writes into.
///
/// PNG carries no rewritable orientation tag and is re-encoded as JPEG.
pub fn rewrite_container(input: ImageFormat) -> ImageFormat {
    match input {
        ImageFormat::Png => ImageFormat::Jpeg,
        other => other,
    }
}

/// Plan an orientation rewrite without executing it.
///
/// A missing or unreadable orientation counts as [`Orientation::Up`].
pub fn plan_rewrite<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    op: OrientationOp,
) -> EncodeParams {
    let current = codec
        .metadata_at(source, codec.primary_frame_index(source))
        .ok()
        .and_then(|meta| meta.parsed_orientation())
        .unwrap_or(Orientation::Up);

    EncodeParams {
        container: rewrite_container(codec.container_type(source)),
        orientation: compose(current, op),
        preserve_gain_map: true,
    }
}

/// Write the primary frame back with its orientation changed by `op`.
pub fn rewrite_orientation<C: ImageCodec>(
    codec: &C,
    source: &C::Source,
    op: OrientationOp,
) -> Result<Vec<u8>> {
    let params = plan_rewrite(codec, source, op);
    debug!(
        "Rewriting orientation to {:?} as {:?}",
        params.orientation, params.container
    );
    codec.encode(source, codec.primary_frame_index(source), &params)
}
