//! Orientation tag writes through `little_exif`.
//!
//! `little_exif` rewrites an existing EXIF block but panics or silently
//! does nothing on files that have none, so every call runs under
//! `catch_unwind`. A JPEG with no EXIF gets a fresh APP1 segment spliced in
//! after SOI (and JFIF APP0, if present); nothing else in the file moves.
//!
//! Reading is not done here: `ImageDecoder::orientation` covers it.

use super::codec::CodecError;
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExifError {
    /// The container itself could not be parsed.
    #[error("Unreadable EXIF container: {0}")]
    Unreadable(String),
    /// The container parsed but the rewritten bytes could not be produced.
    #[error("EXIF write failed: {0}")]
    Write(String),
}

impl From<ExifError> for CodecError {
    fn from(e: ExifError) -> Self {
        match e {
            ExifError::Unreadable(msg) => CodecError::Decode(msg),
            ExifError::Write(msg) => CodecError::Encode(msg),
        }
    }
}

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP0: [u8; 2] = [0xFF, 0xE0];

/// Set the orientation of a JPEG.
///
/// `has_exif` says whether the file already carries an EXIF block; the
/// caller knows this from the image decoder.
pub fn write_jpeg_orientation(
    bytes: &[u8],
    raw: u16,
    has_exif: bool,
) -> Result<Vec<u8>, ExifError> {
    if has_exif {
        rewrite_existing(bytes, raw, FileExtension::JPEG)
    } else {
        insert_app1(bytes, raw)
    }
}

/// Set the orientation of a TIFF. IFD0 always exists, so `little_exif`
/// can always edit it in place.
pub fn write_tiff_orientation(bytes: &[u8], raw: u16) -> Result<Vec<u8>, ExifError> {
    rewrite_existing(bytes, raw, FileExtension::TIFF)
}

fn rewrite_existing(bytes: &[u8], raw: u16, file_type: FileExtension) -> Result<Vec<u8>, ExifError> {
    let mut buffer = bytes.to_vec();

    let read = panic::catch_unwind(AssertUnwindSafe(|| {
        Metadata::new_from_vec(&buffer, file_type.clone())
    }));
    let mut metadata = match read {
        Ok(Ok(metadata)) => metadata,
        Ok(Err(e)) => return Err(ExifError::Unreadable(format!("{e:?}"))),
        Err(_) => return Err(ExifError::Unreadable("EXIF reader panicked".into())),
    };

    metadata.set_tag(ExifTag::Orientation(vec![raw]));

    let write = panic::catch_unwind(AssertUnwindSafe(|| {
        metadata.write_to_vec(&mut buffer, file_type)
    }));
    match write {
        Ok(Ok(())) => Ok(buffer),
        Ok(Err(e)) => Err(ExifError::Write(format!("{e:?}"))),
        Err(_) => Err(ExifError::Write("EXIF writer panicked".into())),
    }
}

/// Build an APP1 segment holding only the orientation tag and splice it in.
fn insert_app1(bytes: &[u8], raw: u16) -> Result<Vec<u8>, ExifError> {
    if !bytes.starts_with(&SOI) {
        return Err(ExifError::Unreadable("missing JPEG SOI marker".into()));
    }
    let at = app1_position(bytes)?;

    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::Orientation(vec![raw]));
    let segment = panic::catch_unwind(AssertUnwindSafe(|| {
        metadata.as_u8_vec(FileExtension::JPEG)
    }));
    // JPEG serialization is a complete APP1: FF E1, length, "Exif\0\0", TIFF.
    let segment = match segment {
        Ok(Ok(segment)) if segment.starts_with(&[0xFF, 0xE1]) => segment,
        Ok(Ok(_)) => return Err(ExifError::Write("serialized EXIF is not an APP1 segment".into())),
        Ok(Err(e)) => return Err(ExifError::Write(format!("{e:?}"))),
        Err(_) => return Err(ExifError::Write("EXIF serializer panicked".into())),
    };

    let mut out = Vec::with_capacity(bytes.len() + segment.len());
    out.extend_from_slice(&bytes[..at]);
    out.extend_from_slice(&segment);
    out.extend_from_slice(&bytes[at..]);
    Ok(out)
}

/// Offset right after SOI, or after a JFIF APP0 that must stay first.
fn app1_position(bytes: &[u8]) -> Result<usize, ExifError> {
    if bytes.get(2..4) != Some(&APP0[..]) {
        return Ok(2);
    }
    let len = bytes
        .get(4..6)
        .map(|l| usize::from(u16::from_be_bytes([l[0], l[1]])))
        .ok_or_else(|| ExifError::Unreadable("truncated APP0 segment".into()))?;
    let end = 4 + len;
    if len < 2 || end > bytes.len() {
        return Err(ExifError::Unreadable("APP0 length out of bounds".into()));
    }
    Ok(end)
}
