//! Re-timing variable-duration animation frames onto a single base tick.
//!
//! Playback APIs that take a frame list plus one total duration assume every
//! frame is shown for the same time. A GIF's per-frame delays are expressed
//! on that grid by repeating each frame `delay / tick` times, where the tick
//! is the greatest common divisor of all delays.

use std::time::Duration;

/// One decoded frame and how long it is shown, in milliseconds.
///
/// A zero duration means the frame is never shown and is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample<T> {
    pub frame: T,
    pub duration_ms: u32,
}

impl<T> FrameSample<T> {
    pub fn new(frame: T, duration_ms: u32) -> Self {
        Self { frame, duration_ms }
    }
}

/// Frames laid out on a common tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence<T> {
    /// Frames in decode order, each repeated `duration / base_tick` times.
    pub frames: Vec<T>,
    pub base_tick_ms: u32,
    /// Sum of the retained frame durations.
    pub total_duration_ms: u64,
}

impl<T> FrameSequence<T> {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.base_tick_ms))
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.total_duration_ms)
    }
}

/// Whether a source with `frame_count` raw frames exceeds the configured cap.
///
/// Evaluated on the raw count, before zero-duration frames are dropped.
pub fn exceeds_frame_limit(frame_count: usize, max_frames: Option<usize>) -> bool {
    max_frames.is_some_and(|max| frame_count > max)
}

/// Greatest common divisor of two values (Euclid).
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Greatest common divisor of all values; `1` for an empty slice.
pub fn gcd_all(values: &[u32]) -> u32 {
    match values.iter().copied().reduce(gcd) {
        Some(0) | None => 1,
        Some(divisor) => divisor,
    }
}

/// Flatten frame samples onto their common tick.
///
/// Samples with a zero duration are dropped. Returns `None` when nothing is
/// left, so the caller can fall back to a still image.
///
/// # Examples
/// ```
/// # use image_thumbnailer::imaging::{FrameSample, reduce_frames};
/// let reduced = reduce_frames(vec![
///     FrameSample::new('a', 100),
///     FrameSample::new('b', 100),
///     FrameSample::new('c', 200),
/// ])
/// .unwrap();
/// assert_eq!(reduced.frames, vec!['a', 'b', 'c', 'c']);
/// assert_eq!(reduced.total_duration_ms, 400);
/// ```
pub fn reduce_frames<T: Clone>(samples: Vec<FrameSample<T>>) -> Option<FrameSequence<T>> {
    let samples: Vec<FrameSample<T>> = samples
        .into_iter()
        .filter(|sample| sample.duration_ms > 0)
        .collect();
    if samples.is_empty() {
        return None;
    }

    let durations: Vec<u32> = samples.iter().map(|s| s.duration_ms).collect();
    let base_tick_ms = gcd_all(&durations);
    let total_duration_ms = durations.iter().map(|&d| u64::from(d)).sum();

    let mut frames = Vec::with_capacity(
        durations
            .iter()
            .map(|&d| (d / base_tick_ms) as usize)
            .sum(),
    );
    for sample in samples {
        let repeats = (sample.duration_ms / base_tick_ms) as usize;
        frames.extend(std::iter::repeat_n(sample.frame, repeats));
    }

    Some(FrameSequence {
        frames,
        base_tick_ms,
        total_duration_ms,
    })
}
