//! Read-only file access.
//!
//! Every file the checker inspects is opened through [`open_readonly`]; the
//! returned handle has no write capability.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open a file for reading only.
pub fn open_readonly(path: &Path) -> io::Result<File> {
    let file = OpenOptions::new().read(true).open(path)?;
    tracing::trace!(path = %path.display(), "Opened read-only");
    Ok(file)
}
