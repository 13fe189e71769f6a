//! Whole-byte codec: 8 bpp palette indices, 16 bpp masked direct color and
//! 24 bpp BGR triplets.

use log::trace;
use rgb::Rgba;

use super::BitDepth;
use super::masks::ChannelMasks;
use super::raster::{Raster, oriented_height};
use crate::geometry::Region;
use crate::palette::{self, PaletteEntry};

/// Returned by [`ExpandedPixels::pixel`] for coordinates past the stored data.
const OUT_OF_BOUNDS: Rgba<u8> = Rgba {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

#[derive(Clone, Debug)]
pub struct ExpandedPixels {
    raster: Raster,
    masks: ChannelMasks,
}

impl ExpandedPixels {
    /// Zeroed array.
    ///
    /// # Panics
    ///
    /// If `depth` is not 8, 16 or 24 bpp. The envelope reader never hands
    /// other depths to this codec.
    pub fn new(depth: BitDepth, width: u32, height: i32, masks: ChannelMasks) -> Self {
        match depth {
            BitDepth::Eight | BitDepth::Sixteen | BitDepth::TwentyFour => {}
            BitDepth::One | BitDepth::Two | BitDepth::Four => {
                panic!("expanded codec requires 8, 16 or 24 bpp, got {depth:?}")
            }
        }
        Self {
            raster: Raster::zeroed(depth, width, height),
            masks,
        }
    }

    pub(crate) fn raster(&self) -> &Raster {
        &self.raster
    }

    pub(crate) fn raster_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }

    /// Masks as supplied at construction (possibly the all-zero sentinel).
    pub fn masks(&self) -> ChannelMasks {
        self.masks
    }

    fn bytes_per_pixel(&self) -> usize {
        self.raster.depth().bytes_per_pixel()
    }

    /// Color at logical `(row, col)`. Coordinates outside the stored data
    /// read as transparent black.
    pub fn pixel(&self, palette: &[PaletteEntry], row: usize, col: usize) -> Rgba<u8> {
        let bpp = self.bytes_per_pixel();
        let offset = col * bpp;
        if row >= self.raster.rows() || offset + bpp > self.raster.stride() {
            return OUT_OF_BOUNDS;
        }
        let px = &self.raster.row(row)[offset..offset + bpp];
        match self.raster.depth() {
            BitDepth::Eight => palette::lookup(palette, px[0]),
            BitDepth::Sixteen => self.masks.decode(u16::from_le_bytes([px[0], px[1]])),
            _ => Rgba {
                r: px[2],
                g: px[1],
                b: px[0],
                a: 255,
            },
        }
    }

    /// Write `color` into one pixel slot of `bytes_per_pixel` bytes.
    fn encode(&self, palette: &[PaletteEntry], color: Rgba<u8>, out: &mut [u8]) {
        match self.raster.depth() {
            BitDepth::Eight => out[0] = palette::index_of(palette, color),
            BitDepth::Sixteen => out.copy_from_slice(&self.masks.encode(color).to_le_bytes()),
            _ => {
                out[0] = color.b;
                out[1] = color.g;
                out[2] = color.r;
            }
        }
    }

    /// Quarter turn clockwise.
    ///
    /// Every destination pixel is decoded from the source and encoded again,
    /// so 16 and 24 bpp are exact while 8 bpp goes through
    /// [`palette::index_of`] and can land on an equal-colored earlier index.
    pub fn rotate_90(&mut self, palette: &[PaletteEntry]) {
        let new_width = self.raster.rows() as u32;
        let new_height = oriented_height(self.raster.width(), self.raster.is_bottom_up());
        let src_rows = self.raster.rows();
        let bpp = self.bytes_per_pixel();
        trace!(
            "expanded rotate: {}x{} -> {}x{}",
            self.raster.width(),
            self.raster.height(),
            new_width,
            new_height
        );

        let mut rotated = Raster::zeroed(self.raster.depth(), new_width, new_height);
        for i in 0..rotated.rows() {
            let row = rotated.row_mut(i);
            for j in 0..new_width as usize {
                let color = self.pixel(palette, src_rows - 1 - j, i);
                self.encode(palette, color, &mut row[j * bpp..(j + 1) * bpp]);
            }
        }
        self.raster = rotated;
    }

    /// Keep only `region`, which must lie inside the image. Samples are
    /// copied verbatim, so cropping never changes a pixel value.
    pub fn crop(&mut self, region: Region) {
        let bpp = self.bytes_per_pixel();
        let height = oriented_height(region.height(), self.raster.is_bottom_up());
        let start = region.left() as usize * bpp;
        let len = region.width() as usize * bpp;

        let mut cropped = Raster::zeroed(self.raster.depth(), region.width(), height);
        for i in 0..cropped.rows() {
            let src = &self.raster.row(region.top() as usize + i)[start..start + len];
            cropped.row_mut(i)[..len].copy_from_slice(src);
        }
        self.raster = cropped;
    }
}
