//! Format detection and dispatch.
//!
//! The first 8 bytes of the source are matched against a small signature
//! table; the matching walker then re-seeks wherever it needs to and walks
//! the file to its terminator. Walker errors come back wrapped in a
//! `"<FORMAT> file"` context frame.
//!
//! # Walkers
//!
//! - [`png`]: trailing IEND chunk, then length-prefixed chunks
//! - [`jpeg`]: marker segments and entropy-coded data up to EOI
//! - [`gif`]: trailer byte, then blocks and sub-blocks
//! - [`swf`]: declared length against file or decoded payload length

pub mod gif;
pub mod jpeg;
pub mod png;
pub mod swf;

use std::io::{Read, Seek, SeekFrom};

use crate::cursor::ByteCursor;
use crate::error::{CheckError, ErrorKind, IoResultExt, Result};

/// Number of leading bytes read for detection.
pub const SIGNATURE_LEN: usize = 8;

/// A format the checker can walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Gif,
    Jpeg,
    Swf,
}

impl ImageFormat {
    /// Label used in diagnostics (e.g. "PNG").
    pub fn label(self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Swf => "SWF",
        }
    }

    /// Match a signature prefix against [`SIGNATURES`], in table order.
    pub fn detect(signature: &[u8]) -> Option<Self> {
        SIGNATURES
            .iter()
            .find(|sig| sig.matches(signature))
            .map(|sig| sig.format)
    }
}

/// Magic bytes for one format
#[derive(Debug, Clone, Copy)]
pub struct FormatSignature {
    pub format: ImageFormat,
    pub magic: &'static [u8],
    /// Offset of `magic` from the start of the file
    pub offset: usize,
}

impl FormatSignature {
    pub fn matches(&self, signature: &[u8]) -> bool {
        signature
            .get(self.offset..)
            .is_some_and(|rest| rest.starts_with(self.magic))
    }
}

/// Known signatures. The prefixes are disjoint, so order only fixes which
/// entry is tried first.
pub const SIGNATURES: &[FormatSignature] = &[
    FormatSignature {
        format: ImageFormat::Png,
        magic: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        offset: 0,
    },
    FormatSignature {
        format: ImageFormat::Gif,
        magic: b"GIF8",
        offset: 0,
    },
    FormatSignature {
        format: ImageFormat::Jpeg,
        magic: &[0xFF, 0xD8],
        offset: 0,
    },
    // Byte 0 is the compression discriminant (F, C or Z).
    FormatSignature {
        format: ImageFormat::Swf,
        magic: b"WS",
        offset: 1,
    },
];

/// Read the signature, pick a walker and run it over the whole source.
pub fn check_format<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<ImageFormat> {
    cursor
        .seek(SeekFrom::Start(0))
        .or_fail(ErrorKind::Io, "seeking to file start")?;
    let signature: [u8; SIGNATURE_LEN] = cursor
        .read_array()
        .or_fail(ErrorKind::TruncatedSignature, "reading file signature")?;

    let format = ImageFormat::detect(&signature).ok_or_else(|| {
        CheckError::violation(ErrorKind::UnknownFormat, "unknown image file format")
    })?;
    tracing::debug!(format = format.label(), "Matched file signature");

    let walked = match format {
        ImageFormat::Png => png::walk(cursor),
        ImageFormat::Gif => gif::walk(cursor),
        ImageFormat::Jpeg => jpeg::walk(cursor),
        ImageFormat::Swf => swf::walk(cursor),
    };
    walked.map_err(|err| err.context(format!("{} file", format.label())))?;
    Ok(format)
}
