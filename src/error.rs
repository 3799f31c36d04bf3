//! Error types for structural checks.
//!
//! A [`CheckError`] carries the kind of violation, the terminal cause and a
//! stack of context frames. Frames are added innermost first while the error
//! propagates and rendered outermost first, joined by `": "`:
//!
//! ```text
//! PNG file: reading block size: EOF
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io;

use thiserror::Error;

use crate::cursor::PartialRead;

/// Result alias used by every walker.
pub type Result<T, E = CheckError> = std::result::Result<T, E>;

/// Classification of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fewer than 8 bytes at the start of the file.
    TruncatedSignature,
    /// Signature matches none of the known formats.
    UnknownFormat,
    /// Trailing terminator bytes are absent.
    MissingTerminator,
    /// A PNG chunk header or body runs past the end of the file.
    TruncatedChunk,
    /// A JPEG stream ends before the EOI marker.
    TruncatedMarker,
    /// A JPEG marker segment runs past the end of the file.
    TruncatedSegment,
    /// A GIF block header runs past the end of the file.
    TruncatedBlock,
    /// A GIF sub-block runs past the end of the file.
    TruncatedSubBlock,
    /// SWF compression byte is not `F`, `C` or `Z`.
    UnknownCompression,
    /// The SWF payload decoder rejected the stream.
    CorruptCompressedStream,
    /// SWF content is shorter than its declared size.
    SizeMismatch,
    /// Open, seek or read failure not otherwise classified.
    Io,
}

impl ErrorKind {
    /// Short name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TruncatedSignature => "truncated-signature",
            ErrorKind::UnknownFormat => "unknown-format",
            ErrorKind::MissingTerminator => "missing-terminator",
            ErrorKind::TruncatedChunk => "truncated-chunk",
            ErrorKind::TruncatedMarker => "truncated-marker",
            ErrorKind::TruncatedSegment => "truncated-segment",
            ErrorKind::TruncatedBlock => "truncated-block",
            ErrorKind::TruncatedSubBlock => "truncated-sub-block",
            ErrorKind::UnknownCompression => "unknown-compression",
            ErrorKind::CorruptCompressedStream => "corrupt-compressed-stream",
            ErrorKind::SizeMismatch => "size-mismatch",
            ErrorKind::Io => "io",
        }
    }

    /// True for the kinds that mean the file ends too early.
    pub fn is_truncation(self) -> bool {
        matches!(
            self,
            ErrorKind::TruncatedSignature
                | ErrorKind::MissingTerminator
                | ErrorKind::TruncatedChunk
                | ErrorKind::TruncatedMarker
                | ErrorKind::TruncatedSegment
                | ErrorKind::TruncatedBlock
                | ErrorKind::TruncatedSubBlock
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal cause at the bottom of the context chain.
#[derive(Debug, Error)]
pub enum Cause {
    /// The source ended before the first byte of a read, or during a skip.
    #[error("EOF")]
    Eof,
    /// The source ended part-way through a fixed-size read.
    #[error("unexpected EOF")]
    UnexpectedEof,
    /// A structural rule was violated.
    #[error("{0}")]
    Message(Cow<'static, str>),
    /// Any other I/O failure.
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for Cause {
    fn from(err: io::Error) -> Self {
        if err.kind() != io::ErrorKind::UnexpectedEof {
            return Cause::Io(err);
        }
        match err.get_ref() {
            Some(inner) if inner.is::<PartialRead>() => Cause::UnexpectedEof,
            _ => Cause::Eof,
        }
    }
}

/// A failed check: kind, cause and context frames.
#[derive(Debug)]
pub struct CheckError {
    kind: ErrorKind,
    cause: Cause,
    // innermost first
    frames: Vec<Cow<'static, str>>,
}

impl CheckError {
    pub fn new(kind: ErrorKind, cause: impl Into<Cause>) -> Self {
        Self {
            kind,
            cause: cause.into(),
            frames: Vec::new(),
        }
    }

    /// A structural violation described by `message`.
    pub fn violation(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(kind, Cause::Message(message.into()))
    }

    /// Classify an I/O failure: a short read keeps `kind`, anything else is
    /// reported as [`ErrorKind::Io`].
    pub fn from_io(kind: ErrorKind, err: io::Error) -> Self {
        match Cause::from(err) {
            cause @ (Cause::Eof | Cause::UnexpectedEof) => Self::new(kind, cause),
            cause => Self::new(ErrorKind::Io, cause),
        }
    }

    /// Wrap the error in one more (outer) context frame.
    pub fn context(mut self, frame: impl Into<Cow<'static, str>>) -> Self {
        self.frames.push(frame.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Context frames, outermost first.
    pub fn frames(&self) -> impl Iterator<Item = &str> + '_ {
        self.frames.iter().rev().map(|frame| frame.as_ref())
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames() {
            write!(f, "{}: ", frame)?;
        }
        write!(f, "{}", self.cause)
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Typed counterpart of `anyhow::Context` for I/O results inside walkers.
pub(crate) trait IoResultExt<T> {
    fn or_fail(self, kind: ErrorKind, context: &'static str) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn or_fail(self, kind: ErrorKind, context: &'static str) -> Result<T> {
        self.map_err(|err| CheckError::from_io(kind, err).context(context))
    }
}
