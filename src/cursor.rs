//! Buffered, seekable byte cursor shared by the format walkers.
//!
//! Wraps any `Read + Seek` source (an open file, or an in-memory buffer in
//! tests) and exposes the handful of primitives the walkers need: absolute
//! seeks, exact reads, one-byte peeks and bounded discards. Every operation
//! reports a short source as `io::ErrorKind::UnexpectedEof`; a fixed-size read
//! that got some but not all of its bytes carries a [`PartialRead`].

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

use thiserror::Error;

/// Default read-ahead buffer (8 KB)
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Source ended part-way through a fixed-size read.
#[derive(Debug, Error)]
#[error("read {read} of {wanted} bytes")]
pub struct PartialRead {
    pub read: usize,
    pub wanted: usize,
}

pub struct ByteCursor<R> {
    inner: BufReader<R>,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity.max(1), inner),
        }
    }

    /// Seek and return the new absolute position. The read-ahead buffer is
    /// dropped.
    pub fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    /// Read exactly `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        PartialRead {
                            read: filled,
                            wanted: N,
                        },
                    ))
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_u16_be(&mut self) -> io::Result<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32_be(&mut self) -> io::Result<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Next byte without consuming it; `None` at end of stream.
    pub fn peek_u8(&mut self) -> io::Result<Option<u8>> {
        Ok(self.inner.fill_buf()?.first().copied())
    }

    /// Skip `count` bytes by reading them, so a skip past the end of the
    /// source fails instead of silently seeking beyond it.
    pub fn discard(&mut self, count: u64) -> io::Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        if skipped < count {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("skipped {} of {} bytes", skipped, count),
            ));
        }
        Ok(())
    }
}

impl<R: Read> Read for ByteCursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> BufRead for ByteCursor<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}
