//! JPEG: single forward pass over markers and entropy-coded data until EOI.
//!
//! A `0xFF` byte opens a marker. The byte that follows decides what comes
//! next: `0x00` is a stuffed data byte, `RST0..=RST7` and `SOI` carry no
//! payload, `EOI` ends the image, and every other marker is followed by a
//! big-endian segment length that counts its own two bytes.

use std::io::{Read, Seek, SeekFrom};

use crate::cursor::ByteCursor;
use crate::error::{CheckError, ErrorKind, IoResultExt, Result};

const MARKER_PREFIX: u8 = 0xFF;
const STUFFED_ZERO: u8 = 0x00;
const RST0: u8 = 0xD0;
const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const LENGTH_FIELD_LEN: u16 = 2;

pub fn walk<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<()> {
    cursor
        .seek(SeekFrom::Start(0))
        .or_fail(ErrorKind::Io, "seeking to file start")?;

    let mut marker_start = false;
    let mut segments = 0u64;
    loop {
        let byte = cursor
            .read_u8()
            .or_fail(ErrorKind::TruncatedMarker, "reading marker start or entropy-coded data")?;

        if byte == MARKER_PREFIX {
            marker_start = true;
            continue;
        }
        if !marker_start {
            continue;
        }
        marker_start = false;

        match byte {
            STUFFED_ZERO | RST0..=SOI => {}
            EOI => {
                tracing::debug!(segments, "JPEG walk reached EOI");
                return Ok(());
            }
            marker => {
                let size = cursor
                    .read_u16_be()
                    .or_fail(ErrorKind::TruncatedSegment, "reading marker size")?;
                let payload = size.checked_sub(LENGTH_FIELD_LEN).ok_or_else(|| {
                    CheckError::violation(
                        ErrorKind::TruncatedSegment,
                        format!("marker 0x{:02X} has invalid size {}", marker, size),
                    )
                })?;
                tracing::trace!(marker, size, "Skipping JPEG segment");
                cursor
                    .discard(u64::from(payload))
                    .or_fail(ErrorKind::TruncatedSegment, "skipping marker data")?;
                segments += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0xFF, marker];
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn walk_bytes(data: &[u8]) -> Result<()> {
        walk(&mut ByteCursor::new(Cursor::new(data)))
    }

    fn minimal_jpeg() -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        data.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
        data.extend(segment(0xDA, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]));
        data.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn test_minimal_jpeg_passes() {
        walk_bytes(&minimal_jpeg()).unwrap();
    }

    #[test]
    fn test_restart_markers_have_no_payload() {
        let mut data = vec![0xFF, 0xD8];
        data.extend(segment(0xDA, &[0x00; 6]));
        for rst in 0xD0..=0xD7u8 {
            data.extend_from_slice(&[0xAA, 0xBB, 0xFF, rst]);
        }
        data.extend_from_slice(&[0xCC, 0xFF, 0xD9]);
        walk_bytes(&data).unwrap();
    }

    #[test]
    fn test_fill_bytes_before_marker() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xFF, 0xFF];
        data.extend_from_slice(&[0xFE, 0x00, 0x03, b'x']);
        data.extend_from_slice(&[0xFF, 0xFF, 0xD9]);
        walk_bytes(&data).unwrap();
    }

    #[test]
    fn test_segment_length_covers_eoi_lookalike() {
        // The FF D9 inside the comment payload must be skipped, not seen as EOI.
        let mut data = vec![0xFF, 0xD8];
        data.extend(segment(0xFE, &[0xFF, 0xD9]));
        let err = walk_bytes(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedMarker);
    }

    #[test]
    fn test_missing_eoi_is_truncated_marker() {
        let mut data = minimal_jpeg();
        data.truncate(data.len() - 2);
        let err = walk_bytes(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedMarker);
        assert_eq!(
            err.to_string(),
            "reading marker start or entropy-coded data: EOF"
        );
    }

    #[test]
    fn test_cut_inside_segment_is_truncated_segment() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x01, 0x00];
        data.extend_from_slice(&[0u8; 10]);
        let err = walk_bytes(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedSegment);
        assert_eq!(err.to_string(), "skipping marker data: EOF");
    }

    #[test]
    fn test_cut_inside_length_field_is_truncated_segment() {
        let data = [0xFF, 0xD8, 0xFF, 0xDB, 0x00];
        let err = walk_bytes(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedSegment);
        assert_eq!(err.to_string(), "reading marker size: unexpected EOF");
    }

    #[test]
    fn test_length_smaller_than_its_field_is_rejected() {
        let data = [0xFF, 0xD8, 0xFF, 0xC4, 0x00, 0x01, 0xFF, 0xD9];
        let err = walk_bytes(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedSegment);
    }
}
