//! Sub-byte palette codec (1, 2 and 4 bpp).
//!
//! Several indices share one byte, most significant bits first: at 4 bpp the
//! left pixel of a pair lives in the high nibble. Transforms never shuffle
//! bits in place, since stride and byte boundaries move with the width.
//! They read indices from the old array and pack a new one from scratch.

use log::trace;
use rgb::Rgba;

use super::BitDepth;
use super::raster::{Raster, oriented_height};
use crate::geometry::Region;
use crate::palette::{self, PaletteEntry};

#[derive(Clone, Debug)]
pub struct PackedPixels {
    raster: Raster,
}

impl PackedPixels {
    /// Zeroed array. Panics if `depth` is not 1, 2 or 4 bpp.
    pub fn new(depth: BitDepth, width: u32, height: i32) -> Self {
        assert!(depth.is_packed(), "packed codec requires 1, 2 or 4 bpp, got {depth:?}");
        Self {
            raster: Raster::zeroed(depth, width, height),
        }
    }

    /// Pack a fresh array, asking `index_at(row, col)` for every pixel in
    /// logical coordinates. Bits above the sample width are dropped and row
    /// padding stays zero.
    pub fn build(
        depth: BitDepth,
        width: u32,
        height: i32,
        mut index_at: impl FnMut(usize, usize) -> u8,
    ) -> Self {
        let mut out = Self::new(depth, width, height);
        let bits = depth.bits() as u32;
        let per_byte = (8 / bits) as usize;
        let sample_mask = depth.sample_mask();

        for i in 0..out.raster.rows() {
            let row = out.raster.row_mut(i);
            for j in 0..width as usize {
                let shift = (per_byte - 1 - j % per_byte) as u32 * bits;
                row[j / per_byte] |= (index_at(i, j) & sample_mask) << shift;
            }
        }
        out
    }

    pub(crate) fn raster(&self) -> &Raster {
        &self.raster
    }

    pub(crate) fn raster_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }

    /// Raw palette index at logical `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> u8 {
        let bits = self.raster.depth().bits() as u32;
        let per_byte = (8 / bits) as usize;
        let shift = (per_byte - 1 - col % per_byte) as u32 * bits;
        (self.raster.row(row)[col / per_byte] >> shift) & self.raster.depth().sample_mask()
    }

    pub fn pixel(&self, palette: &[PaletteEntry], row: usize, col: usize) -> Rgba<u8> {
        palette::lookup(palette, self.index(row, col))
    }

    /// Quarter turn clockwise. Width and height swap; storage order is kept.
    pub fn rotate_90(&mut self) {
        let new_width = self.raster.rows() as u32;
        let new_height = oriented_height(self.raster.width(), self.raster.is_bottom_up());
        let src_rows = self.raster.rows();
        trace!(
            "packed rotate: {}x{} -> {}x{}",
            self.raster.width(),
            self.raster.height(),
            new_width,
            new_height
        );

        let rotated = Self::build(self.raster.depth(), new_width, new_height, |i, j| {
            self.index(src_rows - 1 - j, i)
        });
        *self = rotated;
    }

    /// Keep only `region`, which must lie inside the image.
    pub fn crop(&mut self, region: Region) {
        let (top, left) = (region.top() as usize, region.left() as usize);
        let height = oriented_height(region.height(), self.raster.is_bottom_up());

        let cropped = Self::build(self.raster.depth(), region.width(), height, |i, j| {
            self.index(top + i, left + j)
        });
        *self = cropped;
    }
}
