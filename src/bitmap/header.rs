//! File and info headers.
//!
//! Only the fields the pixel codecs depend on are interpreted. The info
//! header is kept as raw bytes and written back verbatim with the handful of
//! fields that transforms change patched in place.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{BmpError, Result};
use crate::pixel_array::{BitDepth, ChannelMasks};

pub(crate) const SIGNATURE: [u8; 2] = *b"BM";
pub(crate) const FILE_HEADER_LEN: usize = 14;

pub(crate) const BI_RGB: u32 = 0;
pub(crate) const BI_BITFIELDS: u32 = 3;

const INFO_HEADER_LEN: usize = 40;
const V5_HEADER_LEN: usize = 124;

// Field offsets inside the info header.
const OFF_WIDTH: usize = 4;
const OFF_HEIGHT: usize = 8;
const OFF_PLANES: usize = 12;
const OFF_BPP: usize = 14;
const OFF_COMPRESSION: usize = 16;
const OFF_IMAGE_SIZE: usize = 20;
const OFF_X_PPM: usize = 24;
const OFF_Y_PPM: usize = 28;
const OFF_COLORS: usize = 32;
const OFF_MASKS: usize = 40;
const OFF_CS_TYPE: usize = 56;
const OFF_INTENT: usize = 108;
const OFF_PROFILE_DATA: usize = 112;

const LCS_SRGB: u32 = 0x7352_4742;
const PROFILE_LINKED: u32 = 0x4C49_4E4B;
const PROFILE_EMBEDDED: u32 = 0x4D42_4544;
const LCS_GM_IMAGES: u32 = 4;
/// 72 dpi.
const DEFAULT_PPM: u32 = 2835;

// ---------------------------------------------------------------------------
// Little-endian cursor
// ---------------------------------------------------------------------------

pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(BmpError::UnexpectedEof)?;
        let out = self.data.get(self.pos..end).ok_or(BmpError::UnexpectedEof)?;
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    /// The next `u32` without consuming it.
    fn peek_u32(&self) -> Result<u32> {
        let b = self
            .data
            .get(self.pos..self.pos + 4)
            .ok_or(BmpError::UnexpectedEof)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

fn get_u16(raw: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([raw[off], raw[off + 1]])
}

fn get_u32(raw: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([raw[off], raw[off + 1], raw[off + 2], raw[off + 3]])
}

fn put_u32(raw: &mut [u8], off: usize, value: u32) {
    raw[off..off + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u16(raw: &mut [u8], off: usize, value: u16) {
    raw[off..off + 2].copy_from_slice(&value.to_le_bytes());
}

// ---------------------------------------------------------------------------
// File header
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FileHeader {
    /// Cached total size. Adjusted by the delta of every pixel array resize
    /// rather than recomputed, so a bogus value in the input is carried over.
    pub(crate) file_size: u32,
    pub(crate) reserved: [u8; 4],
    pub(crate) pixel_offset: u32,
}

impl FileHeader {
    /// Parse the 14-byte file header including the signature.
    pub(crate) fn parse(r: &mut Reader<'_>) -> Result<Self> {
        let signature = r.bytes(2).map_err(|_| BmpError::NotABmp)?;
        if signature != SIGNATURE {
            return Err(BmpError::NotABmp);
        }
        Ok(Self {
            file_size: r.u32()?,
            reserved: r.array()?,
            pixel_offset: r.u32()?,
        })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&SIGNATURE);
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved);
        out.extend_from_slice(&self.pixel_offset.to_le_bytes());
    }
}

// ---------------------------------------------------------------------------
// Info header
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InfoHeader {
    raw: Vec<u8>,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) depth: BitDepth,
    pub(crate) compression: u32,
    /// Value of the `colors` field as read; 0 means "2^bpp" for indexed depths.
    pub(crate) colors: u32,
    pub(crate) masks: ChannelMasks,
    /// A 40-byte header with bitfields keeps its masks in the 12 bytes
    /// right after it.
    trailing_masks: bool,
    /// Offset of an embedded/linked color profile relative to the start of
    /// the trailer, when the profile lives after the pixel array.
    pub(crate) profile_in_trailer: Option<u32>,
}

impl InfoHeader {
    /// Parse an info header plus any trailing bitfield masks.
    pub(crate) fn parse(r: &mut Reader<'_>) -> Result<Self> {
        let size = r.peek_u32()?;
        match size {
            40 | 52 | 56 | 108 | 124 => {}
            other => return Err(BmpError::UnsupportedHeader(other)),
        }
        let raw = r.bytes(size as usize)?.to_vec();

        let width = get_u32(&raw, OFF_WIDTH) as i32;
        let height = get_u32(&raw, OFF_HEIGHT) as i32;
        let bits = get_u16(&raw, OFF_BPP);
        let compression = get_u32(&raw, OFF_COMPRESSION);
        let colors = get_u32(&raw, OFF_COLORS);

        let depth = BitDepth::from_bits(bits).ok_or(BmpError::UnsupportedBitDepth(bits))?;
        match (compression, depth) {
            (BI_RGB, _) | (BI_BITFIELDS, BitDepth::Sixteen) => {}
            (other, _) => return Err(BmpError::UnsupportedCompression(other)),
        }
        if width <= 0 || height == 0 || height == i32::MIN {
            return Err(BmpError::InvalidDimensions { width, height });
        }

        let mut trailing_masks = false;
        let masks = if compression == BI_BITFIELDS {
            let bytes: &[u8] = if raw.len() > OFF_MASKS {
                &raw[OFF_MASKS..OFF_MASKS + 12]
            } else {
                trailing_masks = true;
                r.bytes(12)?
            };
            ChannelMasks::new(get_u32(bytes, 0), get_u32(bytes, 4), get_u32(bytes, 8))
        } else {
            ChannelMasks::default()
        };

        Ok(Self {
            raw,
            width,
            height,
            depth,
            compression,
            colors,
            masks,
            trailing_masks,
            profile_in_trailer: None,
        })
    }

    /// A fresh BITMAPV5HEADER. 16 bpp images get explicit 5-6-5 bitfields.
    pub(crate) fn new_v5(depth: BitDepth, width: i32, height: i32, colors: u32) -> Self {
        let mut raw = vec![0u8; V5_HEADER_LEN];
        let (compression, masks) = if depth == BitDepth::Sixteen {
            (BI_BITFIELDS, ChannelMasks::RGB565)
        } else {
            (BI_RGB, ChannelMasks::default())
        };

        put_u32(&mut raw, 0, V5_HEADER_LEN as u32);
        put_u32(&mut raw, OFF_WIDTH, width as u32);
        put_u32(&mut raw, OFF_HEIGHT, height as u32);
        put_u16(&mut raw, OFF_PLANES, 1);
        put_u16(&mut raw, OFF_BPP, depth.bits());
        put_u32(&mut raw, OFF_COMPRESSION, compression);
        put_u32(&mut raw, OFF_X_PPM, DEFAULT_PPM);
        put_u32(&mut raw, OFF_Y_PPM, DEFAULT_PPM);
        put_u32(&mut raw, OFF_COLORS, colors);
        put_u32(&mut raw, OFF_MASKS, masks.red);
        put_u32(&mut raw, OFF_MASKS + 4, masks.green);
        put_u32(&mut raw, OFF_MASKS + 8, masks.blue);
        put_u32(&mut raw, OFF_CS_TYPE, LCS_SRGB);
        put_u32(&mut raw, OFF_INTENT, LCS_GM_IMAGES);

        Self {
            raw,
            width,
            height,
            depth,
            compression,
            colors,
            masks,
            trailing_masks: false,
            profile_in_trailer: None,
        }
    }

    /// Number of palette entries stored in the file.
    pub(crate) fn palette_len(&self) -> usize {
        if self.colors == 0 {
            self.depth.max_palette_len()
        } else {
            self.colors as usize
        }
    }

    /// Bytes occupied by this header and its trailing masks.
    pub(crate) fn encoded_len(&self) -> usize {
        self.raw.len() + if self.trailing_masks { 12 } else { 0 }
    }

    /// Profile offset from the start of this header, for V5 headers that
    /// reference an embedded or linked profile.
    pub(crate) fn profile_offset(&self) -> Option<u32> {
        if self.raw.len() < V5_HEADER_LEN {
            return None;
        }
        match get_u32(&self.raw, OFF_CS_TYPE) {
            PROFILE_EMBEDDED | PROFILE_LINKED => Some(get_u32(&self.raw, OFF_PROFILE_DATA)),
            _ => None,
        }
    }

    /// Emit the header with current dimensions. `trailer_start` is the
    /// absolute offset of the first byte after the pixel array.
    pub(crate) fn write(&self, out: &mut Vec<u8>, image_size: u32, trailer_start: usize) {
        let mut raw = self.raw.clone();
        put_u32(&mut raw, OFF_WIDTH, self.width as u32);
        put_u32(&mut raw, OFF_HEIGHT, self.height as u32);
        put_u32(&mut raw, OFF_IMAGE_SIZE, image_size);
        put_u32(&mut raw, OFF_COLORS, self.colors);
        let moved_profile = self.profile_in_trailer.and_then(|rel| {
            let from_header = trailer_start.checked_sub(FILE_HEADER_LEN)?;
            u32::try_from(from_header).ok()?.checked_add(rel)
        });
        if let Some(offset) = moved_profile {
            put_u32(&mut raw, OFF_PROFILE_DATA, offset);
        }
        out.extend_from_slice(&raw);

        if self.trailing_masks {
            out.extend_from_slice(&self.masks.red.to_le_bytes());
            out.extend_from_slice(&self.masks.green.to_le_bytes());
            out.extend_from_slice(&self.masks.blue.to_le_bytes());
        }
    }
}
