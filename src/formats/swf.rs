//! SWF: compression discriminant plus a declared total length in the 8-byte
//! header. Uncompressed files are checked against their on-disk length;
//! compressed ones are fully decoded and the decoded length (plus the header)
//! is checked against the declared size.
//!
//! The declared size is a lower bound. Some encoders pad or round it, so a
//! longer file or payload is accepted.

use std::io::{self, BufRead, Read, Seek, SeekFrom};

use flate2::{Decompress, FlushDecompress, Status};
use lzma_rust2::LzmaReader;

use crate::cursor::ByteCursor;
use crate::error::{Cause, CheckError, ErrorKind, IoResultExt, Result};

pub const HEADER_LEN: u64 = 8;
const FILE_LENGTH_OFFSET: u64 = 4;
const INFLATE_CHUNK: usize = 32 * 1024;

/// Upper bound on the LZMA decoder's memory (dictionary plus state), in KiB.
/// The dictionary size comes from the file and is allocated up front.
pub const LZMA_MEM_LIMIT_KB: u32 = 256 * 1024;

const ZLIB_SIGNATURE_CONTEXT: &str = "parsing ZLIB compressed data signature";
const LZMA_SIGNATURE_CONTEXT: &str = "parsing LZMA compressed data signature";

/// Compression scheme named by the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwfCompression {
    /// `FWS`
    None,
    /// `CWS`
    Zlib,
    /// `ZWS`
    Lzma,
}

impl SwfCompression {
    pub fn from_discriminant(byte: u8) -> Option<Self> {
        match byte {
            b'F' => Some(SwfCompression::None),
            b'C' => Some(SwfCompression::Zlib),
            b'Z' => Some(SwfCompression::Lzma),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SwfCompression::None => "uncompressed",
            SwfCompression::Zlib => "ZLIB",
            SwfCompression::Lzma => "LZMA",
        }
    }
}

/// RFC 1950 header: deflate method, window of at most 32 KiB, valid check
/// bits and no preset dictionary.
pub fn zlib_header_is_valid([cmf, flg]: [u8; 2]) -> bool {
    let method = cmf & 0x0F;
    let window_bits = cmf >> 4;
    let preset_dict = flg & 0x20 != 0;
    let check = (u16::from(cmf) << 8) | u16::from(flg);
    method == 8 && window_bits <= 7 && !preset_dict && check % 31 == 0
}

/// Streaming decoder over the payload that follows the header.
enum PayloadDecoder<R: BufRead> {
    /// The two header bytes, already read and checked, are replayed ahead of
    /// the rest of the stream.
    Zlib(io::Chain<io::Cursor<[u8; 2]>, R>),
    /// Classic `.lzma` framing: properties byte, dictionary size and 64-bit
    /// uncompressed size ahead of the range-coded data.
    Lzma(LzmaReader<R>),
}

impl<R: BufRead> PayloadDecoder<R> {
    fn zlib(header: [u8; 2], payload: R) -> Result<Self> {
        if !zlib_header_is_valid(header) {
            return Err(
                CheckError::violation(ErrorKind::CorruptCompressedStream, "invalid header")
                    .context(ZLIB_SIGNATURE_CONTEXT),
            );
        }
        Ok(PayloadDecoder::Zlib(io::Cursor::new(header).chain(payload)))
    }

    fn lzma(payload: R) -> Result<Self> {
        LzmaReader::new_mem_limit(payload, LZMA_MEM_LIMIT_KB, None)
            .map(PayloadDecoder::Lzma)
            .map_err(|err| {
                CheckError::violation(ErrorKind::CorruptCompressedStream, err.to_string())
                    .context(LZMA_SIGNATURE_CONTEXT)
            })
    }

    /// Decode to the end of the stream, returning the decoded byte count.
    fn drain(&mut self) -> Result<u64> {
        match self {
            PayloadDecoder::Zlib(input) => inflate_to_end(input).map_err(|cause| {
                CheckError::new(ErrorKind::CorruptCompressedStream, cause)
                    .context("decompressing ZLIB compressed data")
            }),
            PayloadDecoder::Lzma(decoder) => {
                io::copy(decoder, &mut io::sink()).map_err(|err| {
                    // the stream header is already consumed, so any end of
                    // input here is mid-stream
                    let cause = match Cause::from(err) {
                        Cause::Eof => Cause::UnexpectedEof,
                        cause => cause,
                    };
                    CheckError::new(ErrorKind::CorruptCompressedStream, cause)
                        .context("decompressing LZMA compressed data")
                })
            }
        }
    }
}

/// Inflate a zlib stream up to its end marker and checksum.
fn inflate_to_end<R: BufRead>(mut input: R) -> std::result::Result<u64, Cause> {
    let mut inflater = Decompress::new(true);
    let mut out = vec![0u8; INFLATE_CHUNK];
    loop {
        let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
        let buf = input.fill_buf()?;
        let eof = buf.is_empty();
        let status = inflater
            .decompress(buf, &mut out, FlushDecompress::None)
            .map_err(|err| Cause::Message(err.to_string().into()))?;
        input.consume((inflater.total_in() - before_in) as usize);

        if status == Status::StreamEnd {
            return Ok(inflater.total_out());
        }
        if inflater.total_in() == before_in && inflater.total_out() == before_out {
            return Err(if eof {
                Cause::UnexpectedEof
            } else {
                Cause::Message("stream made no progress".into())
            });
        }
    }
}

pub fn walk<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<()> {
    cursor
        .seek(SeekFrom::Start(0))
        .or_fail(ErrorKind::Io, "seeking to start of file")?;
    let discriminant = cursor
        .read_u8()
        .or_fail(ErrorKind::TruncatedSignature, "reading SWF file signature")?;
    let compression = SwfCompression::from_discriminant(discriminant).ok_or_else(|| {
        CheckError::violation(ErrorKind::UnknownCompression, "file has unknown compression type")
    })?;

    cursor
        .seek(SeekFrom::Start(FILE_LENGTH_OFFSET))
        .or_fail(ErrorKind::Io, "seeking to file size header")?;
    let declared = u64::from(
        cursor
            .read_u32_le()
            .or_fail(ErrorKind::TruncatedSignature, "reading file size header")?,
    );

    let mut decoder = match compression {
        SwfCompression::None => return check_file_length(cursor, declared),
        SwfCompression::Zlib => {
            let header = cursor
                .read_array()
                .or_fail(ErrorKind::CorruptCompressedStream, ZLIB_SIGNATURE_CONTEXT)?;
            PayloadDecoder::zlib(header, &mut *cursor)?
        }
        SwfCompression::Lzma => {
            let empty = cursor
                .peek_u8()
                .or_fail(ErrorKind::Io, "reading LZMA compressed data")?
                .is_none();
            if empty {
                return Err(CheckError::new(ErrorKind::CorruptCompressedStream, Cause::Eof)
                    .context(LZMA_SIGNATURE_CONTEXT));
            }
            PayloadDecoder::lzma(&mut *cursor)?
        }
    };

    let decoded = decoder.drain()?;
    tracing::debug!(
        compression = compression.label(),
        declared,
        decoded,
        "SWF payload decoded"
    );
    if decoded + HEADER_LEN < declared {
        return Err(CheckError::violation(
            ErrorKind::SizeMismatch,
            format!(
                "{}-decompressed data length is less than file size header",
                compression.label()
            ),
        ));
    }
    Ok(())
}

fn check_file_length<R: Read + Seek>(cursor: &mut ByteCursor<R>, declared: u64) -> Result<()> {
    let total = cursor
        .seek(SeekFrom::End(0))
        .or_fail(ErrorKind::Io, "seeking to file end")?;
    tracing::debug!(declared, total, "SWF uncompressed length");
    if total < declared {
        return Err(CheckError::violation(
            ErrorKind::SizeMismatch,
            "file length is less than file size header",
        ));
    }
    Ok(())
}
