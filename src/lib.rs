//! # bmpxform
//!
//! Rotate, crop and invert BMP images in their stored pixel format.
//!
//! The pixel payload is never widened to RGB for a transform it doesn't
//! need: 1, 2 and 4 bpp rasters are rotated and cropped as packed palette
//! indices, 8, 16 and 24 bpp rasters pixel by pixel. Palette-based images
//! are inverted by rewriting the palette alone.
//!
//! ## Layout
//!
//! - [`Bitmap`] owns the file envelope, the palette and one [`PixelArray`].
//!   It reads and writes files and keeps the header in step with transforms.
//! - [`PixelArray`] is either [`PackedPixels`] or [`ExpandedPixels`],
//!   chosen by [`BitDepth`] when the array is created.
//! - [`row_stride`] and [`payload_size`] give the padded row geometry shared
//!   by both codecs.
//!
//! ## Example
//!
//! ```
//! use bmpxform::{BitDepth, Bitmap};
//!
//! let mut bmp = Bitmap::new(BitDepth::TwentyFour, 4, -2)?;
//! bmp.rotate(90)?;
//! assert_eq!((bmp.width(), bmp.height()), (2, -4));
//!
//! bmp.crop((0, 1), (1, 2))?;
//! assert_eq!((bmp.width(), bmp.height()), (2, -2));
//!
//! let bytes = bmp.to_bytes();
//! assert_eq!(bytes.len() as u32, bmp.file_size());
//! # Ok::<(), bmpxform::BmpError>(())
//! ```
//!
//! ## Feature flags
//!
//! - **`cli`**: builds the `bmpconvert` binary (pulls in `clap`).

#![forbid(unsafe_code)]

extern crate alloc;

mod bitmap;
mod error;
mod geometry;
mod limits;
pub mod palette;
mod pixel_array;
mod rows;
mod stride;

pub use bitmap::{Bitmap, ImageInfo};
pub use error::{BmpError, Result};
pub use geometry::{Point, Region};
pub use limits::Limits;
pub use palette::PaletteEntry;
pub use pixel_array::{BitDepth, ChannelMasks, ExpandedPixels, PackedPixels, PixelArray};
pub use stride::{payload_size, row_stride};

pub use imgref::ImgVec;
pub use rgb::{Bgra, Rgba};
