//! PNG: fixed IEND trailer at the end of the file, then a chunk walk from the
//! first chunk after the signature until IEND.

use std::io::{Read, Seek, SeekFrom};

use crate::cursor::ByteCursor;
use crate::error::{CheckError, ErrorKind, IoResultExt, Result};

/// Zero-length IEND chunk including its fixed CRC.
pub const IEND_CHUNK: [u8; 12] = [
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const IEND: [u8; 4] = *b"IEND";
const FIRST_CHUNK_OFFSET: u64 = 8;
const CRC_LEN: u64 = 4;

pub fn walk<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<()> {
    check_trailer(cursor)?;

    cursor
        .seek(SeekFrom::Start(FIRST_CHUNK_OFFSET))
        .or_fail(ErrorKind::Io, "seeking to first block")?;

    let mut chunks = 0u64;
    loop {
        let length = cursor
            .read_u32_be()
            .or_fail(ErrorKind::TruncatedChunk, "reading block size")?;
        let chunk_type: [u8; 4] = cursor
            .read_array()
            .or_fail(ErrorKind::TruncatedChunk, "reading block type")?;

        if chunk_type == IEND {
            cursor
                .discard(CRC_LEN)
                .or_fail(ErrorKind::TruncatedChunk, "skipping IEND block")?;
            tracing::debug!(chunks, "PNG chunk walk reached IEND");
            return Ok(());
        }

        tracing::trace!(
            chunk = %String::from_utf8_lossy(&chunk_type),
            length,
            "Skipping PNG chunk"
        );
        cursor
            .discard(u64::from(length) + CRC_LEN)
            .or_fail(ErrorKind::TruncatedChunk, "skipping block data")?;
        chunks += 1;
    }
}

fn check_trailer<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<()> {
    let file_len = cursor
        .seek(SeekFrom::End(0))
        .or_fail(ErrorKind::Io, "seeking to trailing IEND block")?;
    let trailer_len = IEND_CHUNK.len() as u64;
    if file_len < trailer_len {
        return Err(CheckError::violation(
            ErrorKind::MissingTerminator,
            "file is too short to end with IEND block",
        ));
    }

    cursor
        .seek(SeekFrom::Start(file_len - trailer_len))
        .or_fail(ErrorKind::Io, "seeking to trailing IEND block")?;
    let trailer: [u8; 12] = cursor
        .read_array()
        .or_fail(ErrorKind::MissingTerminator, "reading trailing IEND block")?;
    if trailer != IEND_CHUNK {
        return Err(CheckError::violation(
            ErrorKind::MissingTerminator,
            "file does not end with IEND block",
        ));
    }
    Ok(())
}
