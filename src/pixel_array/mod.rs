// ---------------------------------------------------------------------------
// Pixel arrays: the decoded view of a bitmap's pixel payload.
//
// Two codecs sit behind one enum. The variant is picked from the bit depth
// when the array is created and never changes afterwards; rotate and crop
// swap in a freshly built buffer, inversion rewrites bytes in place.
// ---------------------------------------------------------------------------

mod expanded;
mod masks;
mod packed;
mod raster;


pub use expanded::ExpandedPixels;
pub use masks::ChannelMasks;
pub use packed::PackedPixels;

use alloc::vec;
use alloc::vec::Vec;

use imgref::ImgVec;
use log::debug;
use rgb::Rgba;

use crate::geometry::Region;
use crate::palette::{self, PaletteEntry};
use crate::rows;
use raster::Raster;

/// Supported sample widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BitDepth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
    TwentyFour = 24,
}

impl BitDepth {
    /// `None` for anything outside {1, 2, 4, 8, 16, 24}.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            24 => Some(Self::TwentyFour),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        self as u16
    }

    /// Several pixels share one byte.
    pub fn is_packed(self) -> bool {
        self.bits() < 8
    }

    /// Samples are palette indices.
    pub fn is_indexed(self) -> bool {
        self.bits() <= 8
    }

    /// `2^bits` for indexed depths, 0 for direct color.
    pub fn max_palette_len(self) -> usize {
        if self.is_indexed() {
            1 << self.bits()
        } else {
            0
        }
    }

    pub(crate) fn bytes_per_pixel(self) -> usize {
        usize::from(self.bits()).div_ceil(8)
    }

    pub(crate) fn sample_mask(self) -> u8 {
        match self {
            Self::One => 0b1,
            Self::Two => 0b11,
            Self::Four => 0b1111,
            _ => 0xFF,
        }
    }
}

/// The pixel payload of one bitmap.
///
/// Operations that need colors borrow the owning bitmap's palette for the
/// duration of the call; the array itself never stores it.
#[derive(Clone, Debug)]
pub enum PixelArray {
    /// 1, 2 and 4 bpp.
    Packed(PackedPixels),
    /// 8, 16 and 24 bpp.
    Expanded(ExpandedPixels),
}

impl PixelArray {
    /// Zeroed array of the variant matching `depth`. `masks` only matter for
    /// 16 bpp.
    pub fn new(depth: BitDepth, width: u32, height: i32, masks: ChannelMasks) -> Self {
        if depth.is_packed() {
            Self::Packed(PackedPixels::new(depth, width, height))
        } else {
            Self::Expanded(ExpandedPixels::new(depth, width, height, masks))
        }
    }

    fn raster(&self) -> &Raster {
        match self {
            Self::Packed(p) => p.raster(),
            Self::Expanded(e) => e.raster(),
        }
    }

    fn raster_mut(&mut self) -> &mut Raster {
        match self {
            Self::Packed(p) => p.raster_mut(),
            Self::Expanded(e) => e.raster_mut(),
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.raster().depth()
    }

    pub fn width(&self) -> u32 {
        self.raster().width()
    }

    /// Signed height: positive for bottom-up storage, negative for top-down.
    pub fn height(&self) -> i32 {
        self.raster().height()
    }

    pub fn row_stride(&self) -> usize {
        self.raster().stride()
    }

    /// Stored bytes in file order, row padding included.
    pub fn data(&self) -> &[u8] {
        self.raster().data()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.raster_mut().data_mut()
    }

    pub fn byte_size(&self) -> usize {
        self.raster().byte_size()
    }

    /// Color at logical `(row, col)`, row 0 being the visual top.
    ///
    /// # Panics
    ///
    /// For packed depths, if the coordinates are outside the image.
    pub fn pixel(&self, palette: &[PaletteEntry], row: usize, col: usize) -> Rgba<u8> {
        match self {
            Self::Packed(p) => p.pixel(palette, row, col),
            Self::Expanded(e) => e.pixel(palette, row, col),
        }
    }

    pub fn rotate_90(&mut self, palette: &[PaletteEntry]) {
        match self {
            Self::Packed(p) => p.rotate_90(),
            Self::Expanded(e) => e.rotate_90(palette),
        }
    }

    pub fn crop(&mut self, region: Region) {
        match self {
            Self::Packed(p) => p.crop(region),
            Self::Expanded(e) => e.crop(region),
        }
    }

    /// Complement every color.
    ///
    /// Indexed depths rewrite the palette and leave the pixels alone. 16 bpp
    /// flips each field of every pixel word as 5-6-5, whatever masks the
    /// array was built with. 24 bpp flips every B, G, R byte. Row padding is
    /// never touched.
    pub fn invert_colors(&mut self, palette: &mut [PaletteEntry]) {
        let depth = self.bit_depth();
        debug!("invert {:?}, {}x{}", depth, self.width(), self.height());
        if depth.is_indexed() {
            palette::invert(palette);
            return;
        }

        let pixel_bytes = self.width() as usize * depth.bytes_per_pixel();
        let raster = self.raster_mut();
        for i in 0..raster.rows() {
            let row = &mut raster.row_mut(i)[..pixel_bytes];
            match depth {
                BitDepth::Sixteen => rows::invert_rgb565_row(row),
                _ => rows::invert_bgr_row(row),
            }
        }
    }

    /// Decode into a top-down RGBA image.
    pub fn to_rgba(&self, palette: &[PaletteEntry]) -> ImgVec<Rgba<u8>> {
        let w = self.width() as usize;
        let h = self.height().unsigned_abs() as usize;
        if w == 0 || h == 0 {
            return ImgVec::new_stride(Vec::new(), 0, 0, 1);
        }
        let mut dst = ImgVec::new(vec![Rgba::new(0, 0, 0, 0); w * h], w, h);

        for (i, dst_row) in dst.rows_mut().enumerate() {
            if self.bit_depth() == BitDepth::TwentyFour {
                rows::bgr_row_to_rgba(&self.raster().row(i)[..w * 3], dst_row);
            } else {
                for (j, d) in dst_row.iter_mut().enumerate() {
                    *d = self.pixel(palette, i, j);
                }
            }
        }
        dst
    }
}
