//! Channel masks for 16-bit direct color.

use rgb::Rgba;

/// Red, green and blue bit masks within a 16-bit pixel word.
///
/// All three zero is a sentinel meaning "5-6-5". A single zero mask (with
/// the others set) is a channel that is always 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ChannelMasks {
    pub const RGB565: Self = Self {
        red: 0xF800,
        green: 0x07E0,
        blue: 0x001F,
    };

    pub const fn new(red: u32, green: u32, blue: u32) -> Self {
        Self { red, green, blue }
    }

    pub fn is_default_sentinel(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }

    /// The masks actually used to pack pixels.
    pub fn resolve(self) -> Self {
        if self.is_default_sentinel() {
            Self::RGB565
        } else {
            self
        }
    }

    /// Decode a pixel word. Alpha is always opaque.
    pub fn decode(self, word: u16) -> Rgba<u8> {
        let m = self.resolve();
        let value = u32::from(word);
        Rgba {
            r: Field::of(m.red).extract(value),
            g: Field::of(m.green).extract(value),
            b: Field::of(m.blue).extract(value),
            a: 255,
        }
    }

    /// Encode a color into a pixel word, rounding each channel to the
    /// nearest representable value. Alpha is ignored.
    pub fn encode(self, color: Rgba<u8>) -> u16 {
        let m = self.resolve();
        let packed = Field::of(m.red).insert(color.r)
            | Field::of(m.green).insert(color.g)
            | Field::of(m.blue).insert(color.b);
        (packed & 0xFFFF) as u16
    }
}

/// Position and width of one channel inside a pixel word.
#[derive(Clone, Copy)]
struct Field {
    mask: u32,
    shift: u32,
    max: u64,
}

impl Field {
    fn of(mask: u32) -> Self {
        let bits = mask.count_ones();
        Self {
            mask,
            shift: if mask == 0 { 0 } else { mask.trailing_zeros() },
            max: (1u64 << bits) - 1,
        }
    }

    fn extract(self, value: u32) -> u8 {
        if self.max == 0 {
            return 0;
        }
        // A mask with holes can yield a raw value above `max`.
        let raw = u64::from((value & self.mask) >> self.shift);
        ((raw * 255 + self.max / 2) / self.max).min(255) as u8
    }

    fn insert(self, component: u8) -> u32 {
        if self.max == 0 {
            return 0;
        }
        let small = (u64::from(component) * self.max + 127) / 255;
        ((small as u32) << self.shift) & self.mask
    }
}
