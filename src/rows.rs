// ---------------------------------------------------------------------------
// Row-level pixel kernels.
//
// Each function takes exactly the pixel bytes of one stored scan line
// (`width * bytes_per_pixel`, no padding). Callers slice padding off before
// calling, so padding bytes are never read or written.
// ---------------------------------------------------------------------------

use rgb::Rgba;

/// Complement every B, G, R byte of a 24-bit row.
pub(crate) fn invert_bgr_row(row: &mut [u8]) {
    for px in row.chunks_exact_mut(3) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

/// Complement the red, green and blue fields of every little-endian 5-6-5
/// word in a 16-bit row.
pub(crate) fn invert_rgb565_row(row: &mut [u8]) {
    for px in row.chunks_exact_mut(2) {
        let v = u16::from_le_bytes([px[0], px[1]]);
        let r = 31 - ((v >> 11) & 0x1F);
        let g = 63 - ((v >> 5) & 0x3F);
        let b = 31 - (v & 0x1F);
        px.copy_from_slice(&((r << 11) | (g << 5) | b).to_le_bytes());
    }
}

/// BGR (3 bytes/px) → RGBA, alpha = 255.
pub(crate) fn bgr_row_to_rgba(src: &[u8], dst: &mut [Rgba<u8>]) {
    for (s, d) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *d = Rgba {
            r: s[2],
            g: s[1],
            b: s[0],
            a: 0xFF,
        };
    }
}
