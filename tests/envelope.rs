//! File-level reading and writing.

use bmpxform::{BitDepth, Bitmap, BmpError, ChannelMasks, Limits, PixelArray};

fn le32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

/// Hand-built file with a 40-byte info header, optional BITFIELDS masks
/// after it, `palette` entries and the given pixel payload.
fn legacy_file(
    bpp: u16,
    width: i32,
    height: i32,
    masks: Option<[u32; 3]>,
    palette: &[[u8; 4]],
    pixels: &[u8],
) -> Vec<u8> {
    let masks_len = if masks.is_some() { 12 } else { 0 };
    let offset = 14 + 40 + masks_len + palette.len() * 4;
    let size = offset + pixels.len();

    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&le32(size as u32));
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&le32(offset as u32));

    out.extend_from_slice(&le32(40));
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&le32(if masks.is_some() { 3 } else { 0 }));
    out.extend_from_slice(&le32(pixels.len() as u32));
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&le32(palette.len() as u32));
    out.extend_from_slice(&[0; 4]);

    for m in masks.iter().flatten() {
        out.extend_from_slice(&le32(*m));
    }
    for entry in palette {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(pixels);
    out
}

#[test]
fn reads_legacy_info_header() {
    // 3x2 at 4 bpp, bottom-up, 4-byte rows.
    let pixels = [0x12, 0x30, 0, 0, 0x01, 0x20, 0, 0];
    let palette = [[0, 0, 0, 0], [0, 0, 255, 0], [0, 255, 0, 0], [255, 0, 0, 0]];
    let data = legacy_file(4, 3, 2, None, &palette, &pixels);

    let bmp = Bitmap::from_bytes(&data).unwrap();
    assert_eq!(bmp.bit_depth(), BitDepth::Four);
    assert_eq!((bmp.width(), bmp.height()), (3, 2));
    assert_eq!(bmp.palette().len(), 4);
    assert_eq!(bmp.file_size(), data.len() as u32);
    assert!(matches!(bmp.pixels(), PixelArray::Packed(_)));

    // Logical row 0 is the last stored row: indices 0, 1, 2.
    assert_eq!(bmp.pixel(1, 0).map(|c| c.r), Some(255));
    assert_eq!(bmp.pixel(2, 0).map(|c| c.g), Some(255));
    // Row 1: indices 1, 2, 3.
    assert_eq!(bmp.pixel(2, 1).map(|c| c.b), Some(255));

    assert_eq!(bmp.to_bytes(), data);
}

#[test]
fn bitfield_masks_after_legacy_header() {
    let masks = [0x7C00, 0x03E0, 0x001F];
    let pixels = 0x7C00u16.to_le_bytes();
    let data = legacy_file(16, 1, -1, Some(masks), &[], &[pixels[0], pixels[1], 0, 0]);

    let mut bmp = Bitmap::from_bytes(&data).unwrap();
    assert_eq!(bmp.pixel(0, 0).map(|c| (c.r, c.g, c.b)), Some((255, 0, 0)));
    assert_eq!(bmp.to_bytes(), data);

    if let PixelArray::Expanded(e) = bmp.pixels() {
        assert_eq!(e.masks(), ChannelMasks::new(0x7C00, 0x03E0, 0x001F));
    } else {
        panic!("16 bpp must be expanded");
    }

    // Rotation re-encodes through the masks and keeps them in the output.
    bmp.rotate(180).unwrap();
    let reread = Bitmap::from_bytes(&bmp.to_bytes()).unwrap();
    assert_eq!(reread.pixel(0, 0).map(|c| (c.r, c.g, c.b)), Some((255, 0, 0)));
}

#[test]
fn explicit_565_masks_decode_like_the_default() {
    let word = 0b10101_011011_01110u16.to_le_bytes();
    let px = [word[0], word[1], 0, 0];
    let plain = Bitmap::from_bytes(&legacy_file(16, 1, 1, None, &[], &px)).unwrap();
    let explicit = Bitmap::from_bytes(&legacy_file(
        16,
        1,
        1,
        Some([0xF800, 0x07E0, 0x001F]),
        &[],
        &px,
    ))
    .unwrap();
    assert_eq!(plain.pixel(0, 0), explicit.pixel(0, 0));
}

#[test]
fn round_trip_every_depth() {
    for depth in [
        BitDepth::One,
        BitDepth::Two,
        BitDepth::Four,
        BitDepth::Eight,
        BitDepth::Sixteen,
        BitDepth::TwentyFour,
    ] {
        for height in [5, -5] {
            let mut bmp = Bitmap::new(depth, 7, height).unwrap();
            for (k, b) in bmp.pixel_data_mut().iter_mut().enumerate() {
                *b = (k * 13 + 7) as u8;
            }
            let bytes = bmp.to_bytes();
            assert_eq!(bytes.len() as u32, bmp.file_size());
            let reread = Bitmap::from_bytes(&bytes).unwrap();
            assert_eq!(reread.bit_depth(), depth);
            assert_eq!(reread.height(), height);
            assert_eq!(reread.palette(), bmp.palette());
            assert_eq!(reread.pixels().data(), bmp.pixels().data());
            assert_eq!(reread.to_bytes(), bytes);
        }
    }
}

#[test]
fn transformed_file_reads_back() {
    let mut bmp = Bitmap::new(BitDepth::Two, 9, -4).unwrap();
    for (k, b) in bmp.pixel_data_mut().iter_mut().enumerate() {
        *b = (k * 29) as u8;
    }
    bmp.rotate(90).unwrap();
    bmp.crop((1, 2), (3, 8)).unwrap();
    bmp.invert_colors();

    let bytes = bmp.to_bytes();
    assert_eq!(bytes.len() as u32, bmp.file_size());
    let reread = Bitmap::from_bytes(&bytes).unwrap();
    assert_eq!((reread.width(), reread.height()), (3, -7));
    assert_eq!(reread.to_rgba().buf(), bmp.to_rgba().buf());
}

#[test]
fn rejects_malformed_input() {
    assert!(matches!(Bitmap::from_bytes(b""), Err(BmpError::NotABmp)));
    assert!(matches!(
        Bitmap::from_bytes(b"GIF89a\0\0\0\0\0\0\0\0\0\0\0\0"),
        Err(BmpError::NotABmp)
    ));
    assert_eq!(BmpError::NotABmp.to_string(), "not a bmp file");

    let mut data = legacy_file(24, 1, 1, None, &[], &[0; 4]);
    data[28] = 32;
    assert!(matches!(
        Bitmap::from_bytes(&data),
        Err(BmpError::UnsupportedBitDepth(32))
    ));

    let mut data = legacy_file(8, 1, 1, None, &[[0; 4]], &[0; 4]);
    data[30] = 1; // RLE8
    assert!(matches!(
        Bitmap::from_bytes(&data),
        Err(BmpError::UnsupportedCompression(1))
    ));

    let data = legacy_file(24, 1, 0, None, &[], &[]);
    assert!(matches!(
        Bitmap::from_bytes(&data),
        Err(BmpError::InvalidDimensions { width: 1, height: 0 })
    ));

    // Header claims a palette that isn't there.
    let mut data = legacy_file(8, 1, 1, None, &[], &[]);
    data[46] = 200;
    assert!(matches!(
        Bitmap::from_bytes(&data),
        Err(BmpError::UnexpectedEof)
    ));
}

#[test]
fn embedded_profile_follows_the_pixel_array() {
    let mut bmp = Bitmap::new(BitDepth::TwentyFour, 5, 1).unwrap();
    let mut data = bmp.to_bytes();
    let profile = b"fake icc profile";
    let pixel_end = data.len();
    data.extend_from_slice(profile);

    // Point the V5 header at an embedded profile.
    let header = 14;
    data[header + 56..header + 60].copy_from_slice(&0x4D42_4544u32.to_le_bytes());
    let rel = (pixel_end - header) as u32;
    data[header + 112..header + 116].copy_from_slice(&rel.to_le_bytes());
    data[header + 116..header + 120].copy_from_slice(&(profile.len() as u32).to_le_bytes());

    bmp = Bitmap::from_bytes(&data).unwrap();
    bmp.rotate(90).unwrap();
    let out = bmp.to_bytes();
    // One 16-byte row became five 4-byte rows.
    assert_eq!(out.len(), data.len() + 4);

    let stored = u32::from_le_bytes([
        out[header + 112],
        out[header + 113],
        out[header + 114],
        out[header + 115],
    ]) as usize;
    assert_eq!(&out[header + stored..], profile);
}

#[test]
fn profile_offset_past_end_of_file_is_kept_verbatim() {
    let bmp = Bitmap::new(BitDepth::TwentyFour, 5, 1).unwrap();
    let mut data = bmp.to_bytes();
    data.extend_from_slice(b"tail");

    let header = 14;
    data[header + 56..header + 60].copy_from_slice(&0x4D42_4544u32.to_le_bytes());
    data[header + 112..header + 116].copy_from_slice(&u32::MAX.to_le_bytes());

    let mut bmp = Bitmap::from_bytes(&data).unwrap();
    bmp.rotate(90).unwrap();
    let out = bmp.to_bytes();
    assert_eq!(&out[header + 112..header + 116], &u32::MAX.to_le_bytes());
    assert_eq!(&out[out.len() - 4..], b"tail");

    let reread = Bitmap::from_bytes(&out).unwrap();
    assert_eq!((reread.width(), reread.height()), (1, 5));
}

#[test]
fn limits_are_checked_before_allocation() {
    let bytes = Bitmap::new(BitDepth::TwentyFour, 64, 64).unwrap().to_bytes();
    for limits in [
        Limits::none().with_max_width(63),
        Limits::none().with_max_height(63),
        Limits::none().with_max_pixels(64 * 63),
        Limits::none().with_max_memory(64 * 64 * 3 - 1),
    ] {
        assert!(matches!(
            Bitmap::from_bytes_with_limits(&bytes, &limits),
            Err(BmpError::LimitExceeded(_))
        ));
    }
    let ok = Limits::none().with_max_pixels(64 * 64);
    assert!(Bitmap::from_bytes_with_limits(&bytes, &ok).is_ok());
}

#[test]
fn open_and_save_through_the_filesystem() {
    let dir = std::env::temp_dir().join(format!("bmpxform-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("image.bmp");

    let mut bmp = Bitmap::new(BitDepth::Eight, 3, 3).unwrap();
    bmp.pixel_data_mut()[0] = 9;
    bmp.save(&path).unwrap();
    let reread = Bitmap::open(&path).unwrap();
    assert_eq!(reread.pixels().data(), bmp.pixels().data());

    let missing = dir.join("missing.bmp");
    let err = Bitmap::open(&missing).unwrap_err();
    assert!(matches!(err, BmpError::InvalidFilePath { .. }));
    assert!(err.to_string().starts_with("file does not exist: "));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn info_reports_unsigned_height() {
    let bmp = Bitmap::new(BitDepth::One, 10, -3).unwrap();
    let info = bmp.info();
    assert_eq!((info.width, info.height, info.bits_per_pixel), (10, 3, 1));
    assert_eq!(info.file_size, bmp.file_size());
    assert!(info.to_string().contains("bitmap size: 10x3 pixels"));
}
