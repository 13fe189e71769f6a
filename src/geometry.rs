//! Crop coordinates.
//!
//! [`Point`] is what callers hand in (signed, unvalidated); [`Region`] is what
//! the pixel arrays accept, and can only be built by validating two points
//! against an image's dimensions.

use core::fmt;

use crate::error::{BmpError, Result};

/// A caller-supplied pixel coordinate. `x` is the column, `y` the logical row
/// counted from the visual top of the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An inclusive rectangle known to lie inside some image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl Region {
    /// Validate the corners `a` (top-left) and `b` (bottom-right) against an
    /// image of `width` × `height` pixels.
    ///
    /// Both corners must be non-negative, `a <= b` componentwise, every x
    /// must be below `width` and every y below `height`.
    pub fn from_corners(a: Point, b: Point, width: u32, height: u32) -> Result<Self> {
        let invalid = || BmpError::InvalidCoordinates { a, b };

        if a.x > b.x || a.y > b.y {
            return Err(invalid());
        }
        let left = u32::try_from(a.x).map_err(|_| invalid())?;
        let top = u32::try_from(a.y).map_err(|_| invalid())?;
        let right = u32::try_from(b.x).map_err(|_| invalid())?;
        let bottom = u32::try_from(b.y).map_err(|_| invalid())?;
        if right >= width || bottom >= height {
            return Err(invalid());
        }

        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// The whole extent of a `width` × `height` image. Both must be non-zero.
    pub fn full(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            left: 0,
            top: 0,
            right: width - 1,
            bottom: height - 1,
        }
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}
