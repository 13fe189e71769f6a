//! Color tables for indexed (≤ 8 bpp) images.
//!
//! Entries are stored as [`Bgra<u8>`], which is exactly the on-disk layout
//! (blue, green, red, reserved/alpha), so a palette can be read from and
//! written to the file with a plain byte cast.
//!
//! The palette belongs to the [`Bitmap`](crate::Bitmap). Pixel arrays never
//! hold on to it; every operation that needs colors borrows it for the
//! duration of the call.

use alloc::vec::Vec;

use rgb::{Bgra, Rgba};

/// One color table entry, in file order.
pub type PaletteEntry = Bgra<u8>;

/// Returned for indices past the end of the palette.
pub const FALLBACK_COLOR: Rgba<u8> = Rgba {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

#[inline]
pub fn entry_to_rgba(entry: PaletteEntry) -> Rgba<u8> {
    Rgba {
        r: entry.r,
        g: entry.g,
        b: entry.b,
        a: entry.a,
    }
}

/// Color for a stored sample. Out-of-range indices degrade to
/// [`FALLBACK_COLOR`] instead of failing.
#[inline]
pub fn lookup(palette: &[PaletteEntry], index: u8) -> Rgba<u8> {
    palette
        .get(usize::from(index))
        .map_or(FALLBACK_COLOR, |&e| entry_to_rgba(e))
}

/// Index to store for `color` when re-encoding an 8-bit image.
///
/// Picks the first entry that matches all four components exactly. When no
/// entry matches, index 0 is used; with duplicate colors in the table this
/// means a decode/encode cycle can move a pixel to an equal-colored index.
pub fn index_of(palette: &[PaletteEntry], color: Rgba<u8>) -> u8 {
    palette
        .iter()
        .take(256)
        .position(|&e| entry_to_rgba(e) == color)
        .map_or(0, |i| i as u8)
}

/// Complement red, green and blue of every entry. Alpha is left alone.
pub fn invert(palette: &mut [PaletteEntry]) {
    for entry in palette {
        entry.r = 255 - entry.r;
        entry.g = 255 - entry.g;
        entry.b = 255 - entry.b;
    }
}

/// Decode `4 * n` bytes of color table. Trailing bytes that do not form a
/// whole entry are ignored.
pub fn from_bytes(bytes: &[u8]) -> Vec<PaletteEntry> {
    let whole = bytes.len() - bytes.len() % 4;
    bytemuck::pod_collect_to_vec(&bytes[..whole])
}

pub fn as_bytes(palette: &[PaletteEntry]) -> &[u8] {
    bytemuck::cast_slice(palette)
}

/// `len` evenly spaced grays from black to white, reserved byte zeroed.
pub fn gray_ramp(len: usize) -> Vec<PaletteEntry> {
    let steps = len.saturating_sub(1).max(1);
    (0..len)
        .map(|i| {
            let v = (i * 255 / steps) as u8;
            Bgra {
                b: v,
                g: v,
                r: v,
                a: 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn entry(r: u8, g: u8, b: u8) -> PaletteEntry {
        Bgra { b, g, r, a: 0 }
    }

    #[test]
    fn bytes_are_bgra_order() {
        let pal = from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(pal.len(), 2);
        assert_eq!(pal[0], Bgra { b: 1, g: 2, r: 3, a: 4 });
        assert_eq!(as_bytes(&pal), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn lookup_out_of_range_is_fallback() {
        let pal = vec![entry(10, 20, 30)];
        assert_eq!(lookup(&pal, 0), Rgba::new(10, 20, 30, 0));
        assert_eq!(lookup(&pal, 1), FALLBACK_COLOR);
        assert_eq!(lookup(&[], 0), FALLBACK_COLOR);
    }

    #[test]
    fn index_of_prefers_first_match_and_misses_to_zero() {
        let pal = vec![entry(1, 1, 1), entry(9, 9, 9), entry(9, 9, 9)];
        assert_eq!(index_of(&pal, Rgba::new(9, 9, 9, 0)), 1);
        assert_eq!(index_of(&pal, Rgba::new(1, 1, 1, 0)), 0);
        assert_eq!(index_of(&pal, Rgba::new(2, 2, 2, 0)), 0);
        // Alpha participates in the match.
        assert_eq!(index_of(&pal, Rgba::new(9, 9, 9, 255)), 0);
    }

    #[test]
    fn invert_twice_is_identity() {
        let original = vec![
            Bgra { b: 0, g: 128, r: 255, a: 7 },
            Bgra { b: 33, g: 66, r: 99, a: 0 },
        ];
        let mut pal = original.clone();
        invert(&mut pal);
        assert_eq!(pal[0], Bgra { b: 255, g: 127, r: 0, a: 7 });
        invert(&mut pal);
        assert_eq!(pal, original);
    }

    #[test]
    fn gray_ramp_spans_black_to_white() {
        let ramp = gray_ramp(16);
        assert_eq!(ramp.len(), 16);
        assert_eq!(ramp[0], entry(0, 0, 0));
        assert_eq!(ramp[15], entry(255, 255, 255));
        assert_eq!(gray_ramp(1), vec![entry(0, 0, 0)]);
    }
}
