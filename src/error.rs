use std::io;
use std::path::PathBuf;

use crate::geometry::Point;

/// Errors produced while reading, writing, or transforming a bitmap.
///
/// Validation failures are reported before any pixel data is touched, so an
/// `Err` from a transform always leaves the image exactly as it was.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    /// The input does not start with the `BM` signature.
    #[error("not a bmp file")]
    NotABmp,

    /// A file could not be opened or created.
    #[error("file does not exist: {}", path.display())]
    InvalidFilePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input ended before a header, palette or pixel array was complete.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// Info header size other than 40, 52, 56, 108 or 124 bytes.
    #[error("unsupported info header size: {0}")]
    UnsupportedHeader(u32),

    /// Bit depth outside {1, 2, 4, 8, 16, 24}.
    #[error("unsupported bits per pixel: {0}")]
    UnsupportedBitDepth(u16),

    /// RLE, JPEG, PNG or any compression other than plain/bitfields.
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(u32),

    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// Pixel array offset points inside the headers or palette.
    #[error("invalid pixel array offset: {0}")]
    InvalidPixelOffset(u32),

    /// An indexed image was given an empty color table, which the file
    /// format cannot express.
    #[error("{0} bpp image needs at least one palette entry")]
    EmptyPalette(u16),

    /// A configured [`Limits`](crate::Limits) value was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),

    #[error("degrees should be multiple of 90, got {0}")]
    InvalidDegrees(i32),

    #[error("invalid coordinates: {a}, {b}")]
    InvalidCoordinates { a: Point, b: Point },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, BmpError>;
