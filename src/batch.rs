//! Parallel thumbnailing of many contents.
//!
//! Each content gets its own [`ThumbnailMaker`]; nothing mutable is shared
//! between them, so items run independently on a rayon pool sized by
//! [`effective_threads`].

use crate::config::{Configuration, ProcessingConfig, effective_threads};
use crate::imaging::ImageCodec;
use crate::maker::{Thumbnail, ThumbnailMaker};
use crate::types::Content;
use log::debug;
use rayon::prelude::*;

/// Prepare one thumbnail per content, in input order.
///
/// Items that produce no thumbnail are `None`. Errors only if the worker
/// pool cannot be created.
pub fn prepare_thumbnails<C: ImageCodec>(
    contents: &[Content],
    configuration: &Configuration,
    processing: &ProcessingConfig,
    codec: &C,
) -> Result<Vec<Option<Thumbnail>>, rayon::ThreadPoolBuildError> {
    let threads = effective_threads(processing);
    debug!("Preparing {} thumbnails on {threads} threads", contents.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    Ok(pool.install(|| {
        contents
            .par_iter()
            .map(|content| {
                ThumbnailMaker::with_codec(content.clone(), configuration.clone(), codec)
                    .prepare_thumbnail()
            })
            .collect()
    }))
}
