// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Error types for image file I/O.
//!
//! Only reading and writing files can fail. Encoding and decoding channel
//! values is total over the clamped domain, and out-of-bounds texel or
//! channel accesses are programming errors that panic instead of returning
//! an [`Error`].

use std::path::PathBuf;

use crate::file_formats::FileFormat;

/// Result type for image file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing an image file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying reader, writer or filesystem failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No codec is registered for the path's extension.
    #[error("Don't know how to handle image file {0:?}")]
    UnsupportedExtension(PathBuf),

    /// The file header could not be parsed.
    #[error("Malformed {format} header: {reason}")]
    MalformedHeader {
        format: FileFormat,
        reason: String,
    },

    /// The file does not start with the format's magic bytes.
    #[error("Bad {0} signature")]
    BadSignature(FileFormat),

    /// The file ended before all pixel data was read.
    #[error("Premature end of {0} data")]
    Truncated(FileFormat),

    /// The file is well formed but uses a feature this crate does not read.
    #[error("Unsupported {format} file: {reason}")]
    Unsupported {
        format: FileFormat,
        reason: String,
    },

    /// PNG decoding failed, including chunk checksum mismatches.
    #[error("PNG decoding error: {0}")]
    Png(#[from] png::DecodingError),

    /// PNG encoding failed.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// The TGA decoder rejected the file, or its header asked for more
    /// memory than a single image may use.
    #[error("TGA decoding error: {0}")]
    Tga(#[from] ::image::ImageError),

    /// The OpenEXR library rejected the file.
    #[error("OpenEXR error: {0}")]
    Exr(#[from] exr::error::Error),
}

impl Error {
    pub(crate) fn malformed(format: FileFormat, reason: impl Into<String>) -> Self {
        Error::MalformedHeader {
            format,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(format: FileFormat, reason: impl Into<String>) -> Self {
        Error::Unsupported {
            format,
            reason: reason.into(),
        }
    }

    /// Unwraps decoder I/O errors so a short file still reads as [`Error::Truncated`].
    pub(crate) fn from_tga(e: ::image::ImageError) -> Self {
        match e {
            ::image::ImageError::IoError(e) => Error::from_read(FileFormat::Tga, e),
            other => Error::Tga(other),
        }
    }

    /// Maps an unexpected end of input onto [`Error::Truncated`].
    pub(crate) fn from_read(format: FileFormat, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated(format)
        } else {
            Error::Io(e)
        }
    }
}
