//! Scan-line geometry shared by every codec and transform.

/// Byte width of one stored scan line: `bits_per_pixel * width` bits, rounded
/// up to a whole number of 32-bit words.
#[inline]
pub fn row_stride(bits_per_pixel: u16, width: u32) -> usize {
    (usize::from(bits_per_pixel) * width as usize).div_ceil(32) * 4
}

/// Total pixel array size for `|height|` rows of `row_stride` bytes.
#[inline]
pub fn payload_size(row_stride: usize, height: i32) -> usize {
    row_stride * height.unsigned_abs() as usize
}
