//! image-check Library
//!
//! Verifies that PNG, JPEG, GIF and SWF files are structurally complete:
//! every chunk, marker, block or compressed payload is present through to
//! the format's terminator. Content is never decoded and files are opened
//! read-only.
//!
//! # Example
//!
//! ```no_run
//! use image_check::check;
//!
//! match check("photo.jpg") {
//!     Ok(()) => println!("complete"),
//!     Err(err) if err.kind().is_truncation() => println!("truncated: {}", err),
//!     Err(err) => println!("invalid file: {}", err),
//! }
//! ```

pub mod check;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod readonly;

// Re-export commonly used types
pub use check::{check, check_reader, check_with_options, CheckOptions};
pub use config::Config;
pub use cursor::ByteCursor;
pub use error::{Cause, CheckError, ErrorKind, Result};
pub use formats::ImageFormat;
pub use readonly::open_readonly;
