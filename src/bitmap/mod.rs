//! The container: envelope, palette and one [`PixelArray`].
//!
//! [`Bitmap`] reads and writes the file, validates transform parameters and
//! keeps its cached file size in step with the pixel array. It never looks
//! at packed pixel bytes itself.

mod header;

use alloc::vec::Vec;
use core::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use imgref::ImgVec;
use log::debug;
use rgb::Rgba;

use crate::error::{BmpError, Result};
use crate::geometry::{Point, Region};
use crate::limits::Limits;
use crate::palette::{self, PaletteEntry};
use crate::pixel_array::{BitDepth, PixelArray};
use crate::stride::{payload_size, row_stride};
use header::{FILE_HEADER_LEN, FileHeader, InfoHeader, Reader};

/// A decoded BMP file.
#[derive(Clone, Debug)]
pub struct Bitmap {
    file_header: FileHeader,
    header: InfoHeader,
    palette: Vec<PaletteEntry>,
    pixels: PixelArray,
    /// Bytes between the palette and the pixel array.
    gap: Vec<u8>,
    /// Bytes after the pixel array (usually an ICC profile).
    trailer: Vec<u8>,
}

/// Summary printed by `bmpconvert -info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub file_size: u32,
    pub width: u32,
    /// Pixel height, without the orientation sign.
    pub height: u32,
    pub bits_per_pixel: u16,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "file size: {}", self.file_size)?;
        writeln!(f, "bitmap size: {}x{} pixels", self.width, self.height)?;
        write!(f, "bits per pixel: {}", self.bits_per_pixel)
    }
}

impl Bitmap {
    /// A blank image with a BITMAPV5HEADER. Indexed depths get a gray-ramp
    /// palette of `2^bpp` entries; every pixel starts at index/value 0.
    pub fn new(depth: BitDepth, width: u32, height: i32) -> Result<Self> {
        let invalid = || BmpError::InvalidDimensions {
            width: width as i32,
            height,
        };
        let signed_width = i32::try_from(width).map_err(|_| invalid())?;
        if signed_width == 0 || height == 0 || height == i32::MIN {
            return Err(invalid());
        }

        let palette = palette::gray_ramp(depth.max_palette_len());
        let header = InfoHeader::new_v5(depth, signed_width, height, palette.len() as u32);
        let pixels = PixelArray::new(depth, width, height, header.masks);
        let offset = FILE_HEADER_LEN + header.encoded_len() + palette.len() * 4;

        Ok(Self {
            file_header: FileHeader {
                file_size: (offset + pixels.byte_size()) as u32,
                reserved: [0; 4],
                pixel_offset: offset as u32,
            },
            header,
            palette,
            pixels,
            gap: Vec::new(),
            trailer: Vec::new(),
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limits(data, &Limits::none())
    }

    /// Decode `data`, rejecting images that exceed `limits` before the pixel
    /// array is allocated.
    pub fn from_bytes_with_limits(data: &[u8], limits: &Limits) -> Result<Self> {
        let mut r = Reader::new(data);
        let file_header = FileHeader::parse(&mut r)?;
        let mut header = InfoHeader::parse(&mut r)?;

        let palette_len = header.palette_len();
        let palette_bytes = palette_len.checked_mul(4).ok_or(BmpError::UnexpectedEof)?;
        let palette = palette::from_bytes(r.bytes(palette_bytes)?);

        let offset = file_header.pixel_offset as usize;
        let palette_end = r.position();
        if offset < palette_end {
            return Err(BmpError::InvalidPixelOffset(file_header.pixel_offset));
        }
        let gap = r.bytes(offset - palette_end)?.to_vec();

        let width = header.width as u32;
        let stride = row_stride(header.depth.bits(), width);
        let len = payload_size(stride, header.height);
        if limits.has_any() {
            limits.check(width, header.height.unsigned_abs(), len as u64)?;
        }
        let payload = r.bytes(len)?;
        let trailer = data[r.position()..].to_vec();

        // A profile stored after the pixel array has to follow it around.
        // Offsets that point past the end of the file are left as they are.
        let trailer_start = r.position() - FILE_HEADER_LEN;
        header.profile_in_trailer = header
            .profile_offset()
            .and_then(|off| (off as usize).checked_sub(trailer_start))
            .filter(|&rel| rel < trailer.len())
            .map(|rel| rel as u32);

        let mut pixels = PixelArray::new(header.depth, width, header.height, header.masks);
        pixels.data_mut().copy_from_slice(payload);

        debug!(
            "decoded bmp: {}x{} {:?}, compression {}, {} palette entries, {} pixel bytes",
            header.width,
            header.height,
            header.depth,
            header.compression,
            palette.len(),
            len
        );

        Ok(Self {
            file_header,
            header,
            palette,
            pixels,
            gap,
            trailer,
        })
    }

    /// Read and decode the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| BmpError::InvalidFilePath {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    /// Encode into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let offset = FILE_HEADER_LEN
            + self.header.encoded_len()
            + self.palette.len() * 4
            + self.gap.len();
        let trailer_start = offset + self.pixels.byte_size();

        let mut out = Vec::with_capacity(trailer_start + self.trailer.len());
        FileHeader {
            pixel_offset: offset as u32,
            ..self.file_header.clone()
        }
        .write(&mut out);
        self.header
            .write(&mut out, self.pixels.byte_size() as u32, trailer_start);
        out.extend_from_slice(palette::as_bytes(&self.palette));
        out.extend_from_slice(&self.gap);
        out.extend_from_slice(self.pixels.data());
        out.extend_from_slice(&self.trailer);

        debug!("encoded bmp: {} bytes", out.len());
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Encode and write to `path`, creating or truncating it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BmpError::InvalidFilePath {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(io::BufWriter::new(file))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Signed height: positive for bottom-up storage, negative for top-down.
    pub fn height(&self) -> i32 {
        self.pixels.height()
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.pixels.bit_depth()
    }

    /// File size as recorded in the header, kept current across transforms.
    pub fn file_size(&self) -> u32 {
        self.file_header.file_size
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            file_size: self.file_size(),
            width: self.width(),
            height: self.height().unsigned_abs(),
            bits_per_pixel: self.bit_depth().bits(),
        }
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    /// Replace the color table. The file size follows the new entry count.
    ///
    /// A stored count of 0 means a full `2^bpp` table, so indexed images
    /// reject an empty palette.
    pub fn set_palette(&mut self, palette: Vec<PaletteEntry>) -> Result<()> {
        let depth = self.bit_depth();
        if palette.is_empty() && depth.is_indexed() {
            return Err(BmpError::EmptyPalette(depth.bits()));
        }
        let delta = (palette.len() as i64 - self.palette.len() as i64) * 4;
        self.adjust_file_size(delta);
        self.header.colors = palette.len() as u32;
        self.palette = palette;
        Ok(())
    }

    pub fn pixels(&self) -> &PixelArray {
        &self.pixels
    }

    /// Raw pixel array bytes in file order, for filling a fresh image.
    pub fn pixel_data_mut(&mut self) -> &mut [u8] {
        self.pixels.data_mut()
    }

    /// Color at column `x` of logical row `y` (0 = top), or `None` outside
    /// the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.width() || y >= self.height().unsigned_abs() {
            return None;
        }
        Some(self.pixels.pixel(&self.palette, y as usize, x as usize))
    }

    /// Decode into a top-down RGBA image.
    pub fn to_rgba(&self) -> ImgVec<Rgba<u8>> {
        self.pixels.to_rgba(&self.palette)
    }

    /// Rotate clockwise by `degrees`, which must be a multiple of 90. Negative
    /// and large angles are reduced to 0, 90, 180 or 270 first.
    pub fn rotate(&mut self, degrees: i32) -> Result<()> {
        if degrees % 90 != 0 {
            return Err(BmpError::InvalidDegrees(degrees));
        }
        let turns = degrees.rem_euclid(360) / 90;
        debug!("rotate {degrees} degrees: {turns} quarter turns");
        for _ in 0..turns {
            self.rotate_90();
        }
        Ok(())
    }

    /// One quarter turn clockwise.
    pub fn rotate_90(&mut self) {
        let old = self.pixels.byte_size();
        self.pixels.rotate_90(&self.palette);
        self.sync_pixel_geometry(old);
    }

    /// Keep the inclusive rectangle from `a` (top-left) to `b`
    /// (bottom-right). Invalid corners leave the image untouched.
    pub fn crop(&mut self, a: impl Into<Point>, b: impl Into<Point>) -> Result<()> {
        let (width, height) = (self.width(), self.height().unsigned_abs());
        let region = Region::from_corners(a.into(), b.into(), width, height)?;
        if region == Region::full(width, height) {
            debug!("crop covers the whole {width}x{height} image, nothing to do");
            return Ok(());
        }
        let old = self.pixels.byte_size();
        self.pixels.crop(region);
        self.sync_pixel_geometry(old);
        Ok(())
    }

    pub fn invert_colors(&mut self) {
        self.pixels.invert_colors(&mut self.palette);
    }

    fn sync_pixel_geometry(&mut self, old_size: usize) {
        let new_size = self.pixels.byte_size();
        self.adjust_file_size(new_size as i64 - old_size as i64);
        debug!(
            "pixel array {}x{} -> {}x{}, {} -> {} bytes",
            self.header.width,
            self.header.height,
            self.pixels.width(),
            self.pixels.height(),
            old_size,
            new_size
        );
        self.header.width = self.pixels.width() as i32;
        self.header.height = self.pixels.height();
    }

    fn adjust_file_size(&mut self, delta: i64) {
        let size = i64::from(self.file_header.file_size) + delta;
        self.file_header.file_size = size.clamp(0, i64::from(u32::MAX)) as u32;
    }
}
