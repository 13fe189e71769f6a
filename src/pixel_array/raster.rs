//! Backing storage shared by both codecs: a row-major byte matrix of
//! `|height|` scan lines, each `row_stride` bytes wide, plus the orientation
//! rule that maps logical rows onto stored rows.

use alloc::vec;
use alloc::vec::Vec;

use imgref::ImgVec;

use super::BitDepth;
use crate::stride::{payload_size, row_stride};

#[derive(Clone, Debug)]
pub(crate) struct Raster {
    depth: BitDepth,
    width: u32,
    height: i32,
    stride: usize,
    /// `width` of the image is the row stride in bytes; padding is part of
    /// every row.
    bytes: ImgVec<u8>,
}

impl Raster {
    /// All-zero storage for a `width` × `|height|` image.
    pub(crate) fn zeroed(depth: BitDepth, width: u32, height: i32) -> Self {
        let stride = row_stride(depth.bits(), width);
        let len = payload_size(stride, height);
        Self::from_vec(depth, width, height, vec![0; len])
    }

    pub(crate) fn from_vec(depth: BitDepth, width: u32, height: i32, buf: Vec<u8>) -> Self {
        let stride = row_stride(depth.bits(), width);
        debug_assert_eq!(buf.len(), payload_size(stride, height));
        // imgref rejects a zero stride; a zero-width image simply has no rows.
        let rows = if stride == 0 {
            0
        } else {
            height.unsigned_abs() as usize
        };
        Self {
            depth,
            width,
            height,
            stride,
            bytes: ImgVec::new_stride(buf, stride, rows, stride.max(1)),
        }
    }

    pub(crate) fn depth(&self) -> BitDepth {
        self.depth
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    /// Number of scan lines, independent of storage order.
    pub(crate) fn rows(&self) -> usize {
        self.height.unsigned_abs() as usize
    }

    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    /// Positive heights are stored bottom-up.
    pub(crate) fn is_bottom_up(&self) -> bool {
        self.height > 0
    }

    /// Stored row index for logical row `row` (0 = visual top).
    #[inline]
    pub(crate) fn storage_row(&self, row: usize) -> usize {
        if self.is_bottom_up() {
            self.rows() - 1 - row
        } else {
            row
        }
    }

    /// The stored scan line holding logical row `row`, padding included.
    #[inline]
    pub(crate) fn row(&self, row: usize) -> &[u8] {
        let start = self.storage_row(row) * self.stride;
        &self.bytes.buf()[start..start + self.stride]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let start = self.storage_row(row) * self.stride;
        let stride = self.stride;
        &mut self.bytes.buf_mut()[start..start + stride]
    }

    pub(crate) fn data(&self) -> &[u8] {
        self.bytes.buf()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.bytes.buf_mut()
    }

    pub(crate) fn byte_size(&self) -> usize {
        self.bytes.buf().len()
    }
}

/// Signed height for `magnitude` rows in the given storage order.
#[inline]
pub(crate) fn oriented_height(magnitude: u32, bottom_up: bool) -> i32 {
    // Dimensions come from i32 header fields and never exceed i32::MAX.
    let magnitude = magnitude as i32;
    if bottom_up { magnitude } else { -magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_up_maps_top_row_to_last_storage_row() {
        let r = Raster::zeroed(BitDepth::Eight, 3, 4);
        assert!(r.is_bottom_up());
        assert_eq!(r.storage_row(0), 3);
        assert_eq!(r.storage_row(3), 0);
    }

    #[test]
    fn top_down_is_identity() {
        let r = Raster::zeroed(BitDepth::Eight, 3, -4);
        assert!(!r.is_bottom_up());
        assert_eq!(r.storage_row(0), 0);
        assert_eq!(r.storage_row(3), 3);
    }

    #[test]
    fn row_access_goes_through_orientation() {
        let mut r = Raster::zeroed(BitDepth::TwentyFour, 2, 3);
        assert_eq!(r.stride(), 8);
        assert_eq!(r.byte_size(), 24);
        r.row_mut(0)[0] = 0xAB;
        // Logical top row is the last stored row.
        assert_eq!(r.data()[16], 0xAB);
        assert_eq!(r.row(0)[0], 0xAB);
    }

    #[test]
    fn zero_width_has_no_bytes() {
        let r = Raster::zeroed(BitDepth::One, 0, 5);
        assert_eq!(r.stride(), 0);
        assert_eq!(r.byte_size(), 0);
    }

    #[test]
    fn oriented_height_keeps_sign() {
        assert_eq!(oriented_height(7, true), 7);
        assert_eq!(oriented_height(7, false), -7);
    }
}
