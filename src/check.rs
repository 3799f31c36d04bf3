//! Public entry points.
//!
//! [`check`] opens a path read-only, runs the format dispatcher over a
//! buffered cursor and closes the file again on every exit path.

use std::io::{Read, Seek};
use std::path::Path;

use crate::cursor::{ByteCursor, DEFAULT_BUFFER_SIZE};
use crate::error::{CheckError, ErrorKind, Result};
use crate::formats::{self, ImageFormat};
use crate::readonly::open_readonly;

/// Options for a single check
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Read-ahead buffer size of the cursor, in bytes
    pub buffer_size: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Check that the file at `path` is structurally complete.
pub fn check(path: impl AsRef<Path>) -> Result<()> {
    check_with_options(path, &CheckOptions::default()).map(|_| ())
}

/// Like [`check`], returning the detected format on success.
pub fn check_with_options(path: impl AsRef<Path>, options: &CheckOptions) -> Result<ImageFormat> {
    let path = path.as_ref();
    let file = open_readonly(path).map_err(|err| {
        CheckError::from_io(ErrorKind::Io, err).context(format!("open {}", path.display()))
    })?;

    let mut cursor = ByteCursor::with_capacity(options.buffer_size, file);
    let result = formats::check_format(&mut cursor);
    drop(cursor);

    match &result {
        Ok(format) => {
            tracing::debug!(path = %path.display(), format = format.label(), "File is complete")
        }
        Err(err) => {
            tracing::debug!(
                path = %path.display(),
                kind = %err.kind(),
                error = %err,
                "File is invalid"
            )
        }
    }
    result
}

/// Check any seekable source, such as an in-memory buffer.
pub fn check_reader<R: Read + Seek>(reader: R) -> Result<ImageFormat> {
    formats::check_format(&mut ByteCursor::new(reader))
}
